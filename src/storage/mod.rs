//! # Storage Module - Node Directory Persistence
//!
//! File-backed persistence for the records the map reads: mesh nodes (with
//! their position histories) and user-placed waypoints. The paired radio's
//! sync pipeline is the writer of record; from the map's perspective this
//! directory is read-mostly, with upserts exposed for ingest tooling.
//!
//! ## Architecture
//!
//! JSON files under a data directory:
//!
//! ```text
//! data/
//! ├── nodes.json       ← node records with position histories
//! └── waypoints.json   ← waypoint records
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meshmap::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Storage::new("./data").await?;
//!     if let Some(node) = storage.get_node(0x10a3f5e2) {
//!         println!("{}: {} points", node.display_name(), node.position_count());
//!     }
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::model::{Node, Waypoint};

const NODES_FILE: &str = "nodes.json";
const WAYPOINTS_FILE: &str = "waypoints.json";

/// File-backed directory of nodes and waypoints.
pub struct Storage {
    data_dir: PathBuf,
    nodes: HashMap<u32, Node>,
    waypoints: Vec<Waypoint>,
}

impl Storage {
    /// Open the directory rooted at `data_dir`, creating it (and empty record
    /// files) on first use.
    pub async fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| anyhow!("Failed to create data dir {}: {}", data_dir.display(), e))?;

        let nodes = Self::load_json::<Vec<Node>>(&data_dir.join(NODES_FILE))
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|n| (n.num, n))
            .collect::<HashMap<_, _>>();
        let waypoints = Self::load_json::<Vec<Waypoint>>(&data_dir.join(WAYPOINTS_FILE))
            .await?
            .unwrap_or_default();

        info!(
            "storage opened: {} nodes, {} waypoints in {}",
            nodes.len(),
            waypoints.len(),
            data_dir.display()
        );
        Ok(Self {
            data_dir,
            nodes,
            waypoints,
        })
    }

    async fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed to read {}: {}", path.display(), e)),
        }
    }

    async fn save_json<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.data_dir.join(file);
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| anyhow!("Failed to serialize {}: {}", file, e))?;
        fs::write(&path, content)
            .await
            .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
        Ok(())
    }

    pub fn get_node(&self, num: u32) -> Option<&Node> {
        self.nodes.get(&num)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Nodes with a successfully answered metadata query.
    pub fn nodes_with_metadata(&self) -> usize {
        self.nodes.values().filter(|n| n.metadata.is_some()).count()
    }

    /// All nodes, sorted by long display name.
    pub fn nodes_by_name(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by(|a, b| a.display_name().cmp(b.display_name()).then(a.num.cmp(&b.num)));
        nodes
    }

    /// Waypoints visible at `now`: expiry filtering happens at query time.
    pub fn visible_waypoints(&self, now: DateTime<Utc>) -> Vec<&Waypoint> {
        self.waypoints
            .iter()
            .filter(|w| w.is_visible_at(now))
            .collect()
    }

    /// Insert or replace a node record and persist the directory.
    pub async fn upsert_node(&mut self, node: Node) -> Result<()> {
        self.nodes.insert(node.num, node);
        let mut all: Vec<&Node> = self.nodes.values().collect();
        all.sort_by_key(|n| n.num);
        self.save_json(NODES_FILE, &all).await
    }

    /// Insert or replace a waypoint record and persist the directory.
    pub async fn upsert_waypoint(&mut self, waypoint: Waypoint) -> Result<()> {
        match self.waypoints.iter_mut().find(|w| w.id == waypoint.id) {
            Some(existing) => *existing = waypoint,
            None => self.waypoints.push(waypoint),
        }
        self.save_json(WAYPOINTS_FILE, &self.waypoints).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Position};
    use chrono::Duration;

    fn node(num: u32, name: &str) -> Node {
        let mut n = Node::new(num);
        n.user = Some(crate::model::UserProfile {
            long_name: name.to_string(),
            short_name: name.chars().take(3).collect(),
        });
        n.record_position(Position {
            coordinate: Coordinate::new(45.5, -122.6),
            altitude: 80,
            time: Utc::now(),
        });
        n
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut storage = Storage::new(tmp.path()).await.unwrap();
            storage.upsert_node(node(7, "Ridge Repeater")).await.unwrap();
            storage
                .upsert_waypoint(Waypoint {
                    id: 1,
                    name: "trailhead".into(),
                    coordinate: Coordinate::new(45.4, -122.7),
                    expire: None,
                })
                .await
                .unwrap();
        }
        let storage = Storage::new(tmp.path()).await.unwrap();
        assert_eq!(storage.node_count(), 1);
        assert_eq!(storage.waypoint_count(), 1);
        let loaded = storage.get_node(7).unwrap();
        assert_eq!(loaded.display_name(), "Ridge Repeater");
        assert_eq!(loaded.position_count(), 1);
    }

    #[tokio::test]
    async fn nodes_sort_by_display_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = Storage::new(tmp.path()).await.unwrap();
        storage.upsert_node(node(2, "Zulu")).await.unwrap();
        storage.upsert_node(node(1, "Alpha")).await.unwrap();
        let names: Vec<&str> = storage.nodes_by_name().iter().map(|n| n.display_name()).collect();
        assert_eq!(names, vec!["Alpha", "Zulu"]);
    }

    #[tokio::test]
    async fn visible_waypoints_filter_by_expiry_at_query_time() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = Storage::new(tmp.path()).await.unwrap();
        let now = Utc::now();
        for (id, expire) in [
            (1, None),
            (2, Some(now - Duration::seconds(1))),
            (3, Some(now + Duration::seconds(1))),
        ] {
            storage
                .upsert_waypoint(Waypoint {
                    id,
                    name: format!("wp{id}"),
                    coordinate: Coordinate::new(45.0, -122.0),
                    expire,
                })
                .await
                .unwrap();
        }
        let visible: Vec<u32> = storage.visible_waypoints(now).iter().map(|w| w.id).collect();
        assert_eq!(visible, vec![1, 3]);
    }
}
