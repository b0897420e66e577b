//! # Map State Module
//!
//! The view-state engine behind the node map. Everything here is an explicit,
//! event-driven state machine: the controller consumes discrete events (node
//! selected, preference changed, fetch resolved, toggle pressed) and exposes the
//! derived state a rendering layer would bind to. No UI framework types appear at
//! this layer, so the whole thing is testable without a UI harness.
//!
//! - [`camera`] - camera framing derived from a node's position history
//! - [`style`] - map rendering style derived from preferences
//! - [`scene`] - look-around scene state machine and fetch driver
//! - [`controller`] - the composed [`MapViewController`]
//! - [`wake`] - scoped screen idle-timeout suppression

pub mod camera;
pub mod controller;
pub mod scene;
pub mod style;
pub mod wake;

pub use camera::{derive_camera, CameraFraming};
pub use controller::MapViewController;
pub use scene::{
    run_fetch, NoSceneProvider, SceneFetcher, SceneHandle, SceneRequest, SceneResolution,
    SceneState,
};
pub use style::{resolve_style, MapStyle};
pub use wake::{IdleTimer, NoopIdleTimer, WakeGuard};
