//! # Display Preferences Module
//!
//! Persisted map display settings: a handful of independent flags plus the selected
//! base map layer. Preferences survive across sessions and change only through
//! explicit writes from a settings surface; the map controller itself never mutates
//! them.
//!
//! ## Key Contract
//!
//! Values are persisted in an embedded Sled database under fixed string keys. The
//! key names match what the original mobile client stored in its user-defaults
//! store, so a preference database written by one version remains readable by the
//! next:
//!
//! | Key                          | Value  |
//! |------------------------------|--------|
//! | `meshMapShowNodeHistory`     | bool   |
//! | `meshMapShowRouteLines`      | bool   |
//! | `enableMapConvexHull`        | bool   |
//! | `enableMapTraffic`           | bool   |
//! | `enableMapPointsOfInterest`  | bool   |
//! | `meshMapShowWaypoints`       | bool   |
//! | `mapLayer`                   | string |
//!
//! Missing keys fall back to defaults, and an unrecognized `mapLayer` value falls
//! back to `hybrid`, so partially written or older databases load cleanly.

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KEY_SHOW_NODE_HISTORY: &str = "meshMapShowNodeHistory";
pub const KEY_SHOW_ROUTE_LINES: &str = "meshMapShowRouteLines";
pub const KEY_SHOW_CONVEX_HULL: &str = "enableMapConvexHull";
pub const KEY_SHOW_TRAFFIC: &str = "enableMapTraffic";
pub const KEY_SHOW_POINTS_OF_INTEREST: &str = "enableMapPointsOfInterest";
pub const KEY_SHOW_WAYPOINTS: &str = "meshMapShowWaypoints";
pub const KEY_MAP_LAYER: &str = "mapLayer";

/// All persisted preference keys, in display order.
pub const ALL_KEYS: [&str; 7] = [
    KEY_SHOW_NODE_HISTORY,
    KEY_SHOW_ROUTE_LINES,
    KEY_SHOW_CONVEX_HULL,
    KEY_SHOW_TRAFFIC,
    KEY_SHOW_POINTS_OF_INTEREST,
    KEY_SHOW_WAYPOINTS,
    KEY_MAP_LAYER,
];

/// Errors that can arise while reading or writing the preference store.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when addressing a preference by an unrecognized key name.
    #[error("unknown preference key: {0}")]
    UnknownKey(String),

    /// Returned when a supplied value cannot be parsed for its key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Selected base map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Standard,
    #[default]
    Hybrid,
    Satellite,
    Offline,
}

impl MapLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapLayer::Standard => "standard",
            MapLayer::Hybrid => "hybrid",
            MapLayer::Satellite => "satellite",
            MapLayer::Offline => "offline",
        }
    }

    /// Parse a persisted layer name. Unrecognized values fall back to `Hybrid`.
    pub fn from_persisted(value: &str) -> Self {
        match value {
            "standard" => MapLayer::Standard,
            "hybrid" => MapLayer::Hybrid,
            "satellite" => MapLayer::Satellite,
            "offline" => MapLayer::Offline,
            _ => MapLayer::Hybrid,
        }
    }
}

impl std::fmt::Display for MapLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of persisted display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub show_node_history: bool,
    pub show_route_lines: bool,
    pub show_convex_hull: bool,
    pub show_traffic: bool,
    pub show_points_of_interest: bool,
    pub show_waypoints: bool,
    pub map_layer: MapLayer,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            show_node_history: false,
            show_route_lines: false,
            show_convex_hull: false,
            show_traffic: false,
            show_points_of_interest: false,
            show_waypoints: false,
            map_layer: MapLayer::Hybrid,
        }
    }
}

impl DisplayPreferences {
    /// Read a single preference by key name, rendered as its persisted string form.
    pub fn get_by_key(&self, key: &str) -> Result<String, PrefsError> {
        let value = match key {
            KEY_SHOW_NODE_HISTORY => self.show_node_history.to_string(),
            KEY_SHOW_ROUTE_LINES => self.show_route_lines.to_string(),
            KEY_SHOW_CONVEX_HULL => self.show_convex_hull.to_string(),
            KEY_SHOW_TRAFFIC => self.show_traffic.to_string(),
            KEY_SHOW_POINTS_OF_INTEREST => self.show_points_of_interest.to_string(),
            KEY_SHOW_WAYPOINTS => self.show_waypoints.to_string(),
            KEY_MAP_LAYER => self.map_layer.to_string(),
            other => return Err(PrefsError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Set a single preference from its key name and a string value
    /// (`true`/`false` for flags, a layer name for `mapLayer`).
    pub fn set_by_key(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        if key == KEY_MAP_LAYER {
            match value {
                "standard" | "hybrid" | "satellite" | "offline" => {
                    self.map_layer = MapLayer::from_persisted(value);
                    return Ok(());
                }
                other => {
                    return Err(PrefsError::InvalidValue {
                        key: key.to_string(),
                        value: other.to_string(),
                    })
                }
            }
        }
        let flag: bool = value.parse().map_err(|_| PrefsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        match key {
            KEY_SHOW_NODE_HISTORY => self.show_node_history = flag,
            KEY_SHOW_ROUTE_LINES => self.show_route_lines = flag,
            KEY_SHOW_CONVEX_HULL => self.show_convex_hull = flag,
            KEY_SHOW_TRAFFIC => self.show_traffic = flag,
            KEY_SHOW_POINTS_OF_INTEREST => self.show_points_of_interest = flag,
            KEY_SHOW_WAYPOINTS => self.show_waypoints = flag,
            other => return Err(PrefsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Read/write capability for persisted display preferences. Injected into whatever
/// owns a settings surface so the map controller stays constructible in isolation.
pub trait PreferenceStore {
    fn load(&self) -> Result<DisplayPreferences, PrefsError>;
    fn save(&self, prefs: &DisplayPreferences) -> Result<(), PrefsError>;
}

const TREE_PREFS: &str = "display_prefs";

/// Sled-backed persistence for display preferences, one record per legacy key.
pub struct SledPreferenceStore {
    _db: sled::Db,
    prefs: sled::Tree,
}

impl SledPreferenceStore {
    /// Open (or create) the preference store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrefsError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let prefs = db.open_tree(TREE_PREFS)?;
        Ok(Self { _db: db, prefs })
    }

    fn read_flag(&self, key: &str, default: bool) -> Result<bool, PrefsError> {
        match self.prefs.get(key)? {
            Some(raw) => Ok(bincode::deserialize(&raw)?),
            None => Ok(default),
        }
    }

    fn write_flag(&self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.prefs.insert(key, bincode::serialize(&value)?)?;
        Ok(())
    }
}

impl PreferenceStore for SledPreferenceStore {
    fn load(&self) -> Result<DisplayPreferences, PrefsError> {
        let defaults = DisplayPreferences::default();
        let map_layer = match self.prefs.get(KEY_MAP_LAYER)? {
            Some(raw) => MapLayer::from_persisted(std::str::from_utf8(&raw).unwrap_or("")),
            None => defaults.map_layer,
        };
        Ok(DisplayPreferences {
            show_node_history: self
                .read_flag(KEY_SHOW_NODE_HISTORY, defaults.show_node_history)?,
            show_route_lines: self.read_flag(KEY_SHOW_ROUTE_LINES, defaults.show_route_lines)?,
            show_convex_hull: self.read_flag(KEY_SHOW_CONVEX_HULL, defaults.show_convex_hull)?,
            show_traffic: self.read_flag(KEY_SHOW_TRAFFIC, defaults.show_traffic)?,
            show_points_of_interest: self.read_flag(
                KEY_SHOW_POINTS_OF_INTEREST,
                defaults.show_points_of_interest,
            )?,
            show_waypoints: self.read_flag(KEY_SHOW_WAYPOINTS, defaults.show_waypoints)?,
            map_layer,
        })
    }

    fn save(&self, prefs: &DisplayPreferences) -> Result<(), PrefsError> {
        self.write_flag(KEY_SHOW_NODE_HISTORY, prefs.show_node_history)?;
        self.write_flag(KEY_SHOW_ROUTE_LINES, prefs.show_route_lines)?;
        self.write_flag(KEY_SHOW_CONVEX_HULL, prefs.show_convex_hull)?;
        self.write_flag(KEY_SHOW_TRAFFIC, prefs.show_traffic)?;
        self.write_flag(KEY_SHOW_POINTS_OF_INTEREST, prefs.show_points_of_interest)?;
        self.write_flag(KEY_SHOW_WAYPOINTS, prefs.show_waypoints)?;
        self.prefs
            .insert(KEY_MAP_LAYER, prefs.map_layer.as_str().as_bytes())?;
        self.prefs.flush()?;
        Ok(())
    }
}

/// In-memory preference store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    prefs: Mutex<DisplayPreferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: DisplayPreferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<DisplayPreferences, PrefsError> {
        Ok(*self.prefs.lock().expect("prefs lock poisoned"))
    }

    fn save(&self, prefs: &DisplayPreferences) -> Result<(), PrefsError> {
        *self.prefs.lock().expect("prefs lock poisoned") = *prefs;
        Ok(())
    }
}
