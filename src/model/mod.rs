//! # Data Model Module
//!
//! Core records for the node map: mesh nodes, their position histories, and
//! user-placed waypoints. These mirror the records a paired radio syncs to the
//! client; from the map's perspective they are read-mostly snapshots.
//!
//! ## Invariants
//!
//! - A node's position history is chronological and append-only. Rendering always
//!   sees a prefix-consistent view of that history; the "most recent position" is
//!   always the last element.
//! - Positions are immutable once recorded and owned by their node.
//! - A waypoint is visible only while unexpired (no expiry, or expiry at/after the
//!   query instant). Expiry is evaluated at query time, never cached.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A timestamped geographic fix belonging to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Altitude above mean sea level, meters.
    pub altitude: i32,
    pub time: DateTime<Utc>,
}

/// Display identity for a node, as broadcast by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub long_name: String,
    pub short_name: String,
}

/// Device details returned by a remote metadata query. Presence on a node means
/// the remote node has been successfully queried at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub firmware_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_model: Option<String>,
}

/// A peer device in the mesh network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Numeric node identifier, unique on the mesh.
    pub num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Chronological position history; the last element is the most recent fix.
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DeviceMetadata>,
    /// Admin channel index granted by the connected device, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_index: Option<u8>,
}

impl Node {
    /// Create a node with no profile, history, or metadata.
    pub fn new(num: u32) -> Self {
        Self {
            num,
            user: None,
            positions: Vec::new(),
            metadata: None,
            admin_index: None,
        }
    }

    pub fn has_positions(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// The most recent fix: always the last element of the history.
    pub fn latest_position(&self) -> Option<&Position> {
        self.positions.last()
    }

    /// Append a fix to the history. A fix older than the current tail would break
    /// chronological order and is dropped with a warning.
    pub fn record_position(&mut self, position: Position) {
        if let Some(last) = self.positions.last() {
            if position.time < last.time {
                warn!(
                    "node {:08x}: dropping out-of-order position ({} < {})",
                    self.num, position.time, last.time
                );
                return;
            }
        }
        self.positions.push(position);
    }

    /// Long display name, or a placeholder when no profile has been received.
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.long_name.as_str())
            .unwrap_or("unknown")
    }

    pub fn short_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.short_name.as_str())
            .unwrap_or("?")
    }
}

/// A user-placed, optionally time-limited map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: u32,
    pub name: String,
    pub coordinate: Coordinate,
    /// When set, the waypoint is hidden once this instant has passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Whether the waypoint should be shown at `now`: no expiry, or expiry at/after `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match self.expire {
            None => true,
            Some(expire) => expire >= now,
        }
    }
}
