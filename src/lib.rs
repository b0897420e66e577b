//! # Meshmap - Node Map View-State Engine for Mesh Radio Clients
//!
//! Meshmap implements the presentation-state core of a mesh-radio client's node map:
//! given a selected node's position history and a set of persisted display preferences,
//! it derives camera framing, the active map rendering style, overlay visibility, and
//! the state of the optional "look-around" immersive scene.
//!
//! ## Features
//!
//! - **Camera Derivation**: Empty-state / fit-all / centered framing computed purely from
//!   a node's position history, with fixed oblique framing constants for single-fix nodes.
//! - **Look-Around State Machine**: Explicit `Idle → Fetching → Available ⇄ Showing`
//!   transitions with generation-tagged fetches so a stale result can never leak into a
//!   newly selected node's state.
//! - **Persisted Preferences**: Display flags and the selected map layer stored in an
//!   embedded Sled key/value store under the same key names the original mobile client
//!   persisted, so preference databases stay portable across versions.
//! - **Node Directory**: JSON-file backed node, position, and waypoint records with
//!   expiry-filtered waypoint queries.
//! - **Async Design**: Built with Tokio; the scene fetch is the only asynchronous
//!   operation and is bounded by a configurable timeout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshmap::map::MapViewController;
//! use meshmap::model::Node;
//! use meshmap::prefs::DisplayPreferences;
//!
//! let mut view = MapViewController::new(DisplayPreferences::default());
//! let request = view.select_node(Some(Node::new(0x10a3f5e2)));
//! assert!(request.is_none()); // a node without positions never triggers a fetch
//! ```
//!
//! ## Module Organization
//!
//! - [`map`] - Camera, style, scene, and controller logic for the node map
//! - [`model`] - Node, position, and waypoint records
//! - [`prefs`] - Persisted display preferences and the preference store
//! - [`storage`] - Node and waypoint directory persistence
//! - [`config`] - Configuration management

pub mod config;
pub mod map;
pub mod model;
pub mod prefs;
pub mod storage;
