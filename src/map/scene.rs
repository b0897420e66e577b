//! Look-around scene state machine and the async fetch driver.
//!
//! Fetching an immersive ground-level scene is best-effort: failures, timeouts,
//! and coordinates with no coverage all degrade to [`SceneState::Unavailable`]
//! and suppress the affordance, never the map itself. Every fetch carries the
//! generation of the node selection it was issued for; a resolution whose
//! generation no longer matches is stale and gets dropped on the floor.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::model::Coordinate;

/// Opaque handle to a fetched immersive scene, as produced by the platform's
/// scene provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandle {
    pub id: String,
    pub coordinate: Coordinate,
}

/// Look-around availability and presentation state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SceneState {
    /// Nothing fetched yet for the current selection.
    #[default]
    Idle,
    /// A fetch for the current selection is outstanding.
    Fetching,
    /// A scene exists for the latest fix; the affordance is offered but hidden.
    Available(SceneHandle),
    /// The scene overlay is presented.
    Showing(SceneHandle),
    /// No scene exists (or the fetch failed); the affordance is suppressed.
    Unavailable,
}

impl SceneState {
    /// Whether the look-around affordance should be offered at all.
    pub fn is_offered(&self) -> bool {
        matches!(self, SceneState::Available(_) | SceneState::Showing(_))
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, SceneState::Showing(_))
    }
}

/// A fetch the controller has asked its driver to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRequest {
    /// Node-selection generation this fetch belongs to.
    pub generation: u64,
    /// Most recent fix of the node selected at issue time.
    pub coordinate: Coordinate,
}

/// The completed outcome of a [`SceneRequest`], fed back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneResolution {
    pub generation: u64,
    /// `None` covers failure, timeout, and no-coverage alike.
    pub outcome: Option<SceneHandle>,
}

/// Capability to fetch an immersive scene for a coordinate. May legitimately
/// return `Ok(None)` where there is no coverage.
pub trait SceneFetcher {
    fn fetch_scene(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = anyhow::Result<Option<SceneHandle>>> + Send;
}

/// A fetcher for environments without a scene provider: every coordinate
/// resolves to no coverage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSceneProvider;

impl SceneFetcher for NoSceneProvider {
    async fn fetch_scene(&self, _coordinate: Coordinate) -> anyhow::Result<Option<SceneHandle>> {
        Ok(None)
    }
}

/// Drive one scene fetch to completion, bounded by `timeout`.
///
/// Errors and timeouts are logged at debug level and collapse to an empty
/// outcome; the primary map rendering is never blocked or failed by this path.
pub async fn run_fetch<F: SceneFetcher>(
    fetcher: &F,
    request: SceneRequest,
    timeout: Duration,
) -> SceneResolution {
    let outcome = match tokio::time::timeout(timeout, fetcher.fetch_scene(request.coordinate)).await
    {
        Ok(Ok(handle)) => handle,
        Ok(Err(err)) => {
            debug!(
                "look-around fetch failed for ({:.5}, {:.5}): {err:#}",
                request.coordinate.latitude, request.coordinate.longitude
            );
            None
        }
        Err(_) => {
            debug!(
                "look-around fetch timed out after {}ms",
                timeout.as_millis()
            );
            None
        }
    };
    SceneResolution {
        generation: request.generation,
        outcome,
    }
}
