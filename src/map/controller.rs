//! The composed map view-state controller.

use std::sync::Arc;

use log::debug;

use crate::map::camera::{derive_camera, CameraFraming};
use crate::map::scene::{SceneRequest, SceneResolution, SceneState};
use crate::map::style::{resolve_style, MapStyle};
use crate::map::wake::{IdleTimer, WakeGuard};
use crate::model::Node;
use crate::prefs::DisplayPreferences;

/// # Map View State
///
/// Derives everything a node-map surface binds to: camera framing, rendering
/// style, the look-around scene state, and the altitude-overlay flag. The
/// controller is a plain state machine driven by discrete events; it performs no
/// I/O itself.
///
/// ## Lifecycle
///
/// 1. **Construct** with the persisted [`DisplayPreferences`].
/// 2. **`select_node`** whenever the user picks a node (including the first).
///    Returns a [`SceneRequest`] when a look-around fetch should be started.
/// 3. **`activate`** when the view becomes visible: takes the wake guard and,
///    on first display, issues the initial scene fetch.
/// 4. **`scene_resolved`** when the driver completes a fetch. Resolutions from
///    a superseded node selection are discarded by generation.
/// 5. **`toggle_look_around` / `toggle_altitude`** on user action; the two
///    overlays are mutually exclusive.
/// 6. **`apply_preferences`** after the settings sheet writes new values.
/// 7. **`deactivate`** (or drop) releases the wake guard.
///
/// ## Threading
///
/// All events are expected on one thread/event loop. The only asynchronous
/// operation, the scene fetch, happens outside the controller and re-enters it
/// as a `scene_resolved` event.
pub struct MapViewController {
    node: Option<Node>,
    prefs: DisplayPreferences,
    camera: CameraFraming,
    style: MapStyle,
    scene: SceneState,
    showing_altitude: bool,
    /// Bumped on every node-selection change; tags outgoing fetches.
    generation: u64,
    wake: Option<WakeGuard>,
}

impl MapViewController {
    /// Create a controller with no node selected.
    pub fn new(prefs: DisplayPreferences) -> Self {
        Self {
            node: None,
            camera: CameraFraming::Unavailable,
            style: resolve_style(prefs.map_layer, &prefs),
            scene: SceneState::Idle,
            showing_altitude: false,
            generation: 0,
            prefs,
            wake: None,
        }
    }

    /// The view became visible. Suppresses the screen idle-timeout for as long
    /// as the controller stays active and, if no fetch has been issued for the
    /// current selection yet, starts one.
    pub fn activate(&mut self, idle_timer: Arc<dyn IdleTimer>) -> Option<SceneRequest> {
        if self.wake.is_none() {
            self.wake = Some(WakeGuard::acquire(idle_timer));
        }
        self.style = resolve_style(self.prefs.map_layer, &self.prefs);
        self.camera = match &self.node {
            Some(node) => derive_camera(node),
            None => CameraFraming::Unavailable,
        };
        if matches!(self.scene, SceneState::Idle) {
            return self.begin_fetch();
        }
        None
    }

    /// The view is no longer visible; restores the screen idle-timeout.
    pub fn deactivate(&mut self) {
        self.wake = None;
    }

    /// The user picked a different node (or cleared the selection). Resets both
    /// auxiliary overlays, re-derives the camera, and issues exactly one new
    /// fetch for the node's most recent fix.
    pub fn select_node(&mut self, node: Option<Node>) -> Option<SceneRequest> {
        self.generation += 1;
        self.showing_altitude = false;
        self.scene = SceneState::Idle;
        self.node = node;
        self.camera = match &self.node {
            Some(node) => derive_camera(node),
            None => CameraFraming::Unavailable,
        };
        debug!(
            "node selection changed (generation {}): camera {:?}",
            self.generation, self.camera
        );
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> Option<SceneRequest> {
        let latest = self.node.as_ref().and_then(|n| n.latest_position())?;
        self.scene = SceneState::Fetching;
        Some(SceneRequest {
            generation: self.generation,
            coordinate: latest.coordinate,
        })
    }

    /// A scene fetch completed. Resolutions tagged with a superseded generation
    /// belong to a previously selected node and are dropped.
    pub fn scene_resolved(&mut self, resolution: SceneResolution) {
        if resolution.generation != self.generation {
            debug!(
                "dropping stale scene resolution (generation {} != {})",
                resolution.generation, self.generation
            );
            return;
        }
        self.scene = match resolution.outcome {
            Some(handle) => SceneState::Available(handle),
            None => SceneState::Unavailable,
        };
    }

    /// Toggle the look-around overlay. Only effective once a scene is available;
    /// presenting it hides the altitude overlay.
    pub fn toggle_look_around(&mut self) {
        self.scene = match std::mem::take(&mut self.scene) {
            SceneState::Available(handle) => {
                self.showing_altitude = false;
                SceneState::Showing(handle)
            }
            SceneState::Showing(handle) => SceneState::Available(handle),
            other => other,
        };
    }

    /// The altitude overlay is only offerable for nodes with a track to chart.
    pub fn altitude_offerable(&self) -> bool {
        self.node
            .as_ref()
            .map(|n| n.position_count() > 1)
            .unwrap_or(false)
    }

    /// Toggle the altitude overlay. Presenting it hides the look-around overlay.
    pub fn toggle_altitude(&mut self) {
        if !self.altitude_offerable() {
            return;
        }
        if self.showing_altitude {
            self.showing_altitude = false;
            return;
        }
        self.scene = match std::mem::take(&mut self.scene) {
            SceneState::Showing(handle) => SceneState::Available(handle),
            other => other,
        };
        self.showing_altitude = true;
    }

    /// The settings sheet wrote new preferences; re-resolve the rendering style.
    pub fn apply_preferences(&mut self, prefs: DisplayPreferences) {
        self.prefs = prefs;
        self.style = resolve_style(prefs.map_layer, &prefs);
    }

    pub fn camera(&self) -> &CameraFraming {
        &self.camera
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn is_showing_altitude(&self) -> bool {
        self.showing_altitude
    }

    pub fn preferences(&self) -> &DisplayPreferences {
        &self.prefs
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.wake.is_some()
    }
}
