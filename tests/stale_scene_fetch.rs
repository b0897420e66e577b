//! A scene fetch outstanding at node-change time must never apply to the newly
//! selected node.

mod common;

use std::sync::Mutex;
use std::time::Duration;

use common::tracked_node;
use meshmap::map::{
    run_fetch, MapViewController, SceneFetcher, SceneHandle, SceneResolution, SceneState,
};
use meshmap::model::Coordinate;
use meshmap::prefs::DisplayPreferences;
use tokio::sync::oneshot;

#[test]
fn stale_resolution_is_dropped_by_generation() {
    let mut view = MapViewController::new(DisplayPreferences::default());

    // Select node A; its fetch stays pending.
    let request_a = view.select_node(Some(tracked_node(0xa, 2))).unwrap();

    // Select node B before A's fetch resolves.
    let request_b = view.select_node(Some(tracked_node(0xb, 2))).unwrap();
    assert_ne!(request_a.generation, request_b.generation);
    assert_eq!(view.scene(), &SceneState::Fetching);

    // A's result finally arrives. It must not touch B's state.
    view.scene_resolved(SceneResolution {
        generation: request_a.generation,
        outcome: Some(SceneHandle {
            id: "stale-scene-for-a".into(),
            coordinate: request_a.coordinate,
        }),
    });
    assert_eq!(
        view.scene(),
        &SceneState::Fetching,
        "stale resolution leaked into the new selection"
    );

    // B's own result still lands normally.
    view.scene_resolved(SceneResolution {
        generation: request_b.generation,
        outcome: None,
    });
    assert_eq!(view.scene(), &SceneState::Unavailable);
}

/// Fetcher whose completions are released one at a time from the test body.
struct GatedFetcher {
    gates: Mutex<Vec<oneshot::Receiver<Option<SceneHandle>>>>,
}

impl SceneFetcher for GatedFetcher {
    async fn fetch_scene(&self, _c: Coordinate) -> anyhow::Result<Option<SceneHandle>> {
        let gate = self
            .gates
            .lock()
            .expect("gate lock")
            .pop()
            .expect("a gate per fetch");
        Ok(gate.await?)
    }
}

#[tokio::test]
async fn late_arriving_fetch_does_not_overwrite_new_selection() {
    let (release_a, gate_a) = oneshot::channel();
    let fetcher = GatedFetcher {
        gates: Mutex::new(vec![gate_a]),
    };

    let mut view = MapViewController::new(DisplayPreferences::default());
    let request_a = view.select_node(Some(tracked_node(0xa, 3))).unwrap();
    let pending_a = tokio::spawn(async move {
        run_fetch(&fetcher, request_a, Duration::from_secs(5)).await
    });

    // The user picks node B while A's fetch is in flight.
    let request_b = view.select_node(Some(tracked_node(0xb, 3))).unwrap();

    // A's fetch now completes with a real scene.
    release_a
        .send(Some(SceneHandle {
            id: "scene-a".into(),
            coordinate: request_a.coordinate,
        }))
        .expect("receiver alive");
    let resolution_a = pending_a.await.expect("fetch task");
    view.scene_resolved(resolution_a);

    assert_eq!(
        view.scene(),
        &SceneState::Fetching,
        "node B's auxiliary state must remain unaffected by A's result"
    );

    view.scene_resolved(SceneResolution {
        generation: request_b.generation,
        outcome: Some(SceneHandle {
            id: "scene-b".into(),
            coordinate: request_b.coordinate,
        }),
    });
    match view.scene() {
        SceneState::Available(handle) => assert_eq!(handle.id, "scene-b"),
        other => panic!("expected node B's scene, got {other:?}"),
    }
}
