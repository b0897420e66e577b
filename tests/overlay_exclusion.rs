//! Mutual exclusion between the look-around overlay and the altitude overlay.

mod common;

use common::tracked_node;
use meshmap::map::{MapViewController, SceneResolution, SceneState};
use meshmap::prefs::DisplayPreferences;

/// Select a multi-fix node and resolve its scene fetch successfully, leaving the
/// look-around affordance available.
fn view_with_available_scene() -> MapViewController {
    let mut view = MapViewController::new(DisplayPreferences::default());
    let request = view
        .select_node(Some(tracked_node(9, 4)))
        .expect("multi-fix node fetches a scene");
    view.scene_resolved(SceneResolution {
        generation: request.generation,
        outcome: Some(meshmap::map::SceneHandle {
            id: "scene".into(),
            coordinate: request.coordinate,
        }),
    });
    assert!(view.scene().is_offered());
    view
}

#[test]
fn showing_altitude_hides_look_around() {
    let mut view = view_with_available_scene();
    view.toggle_look_around();
    assert!(view.scene().is_showing());

    view.toggle_altitude();
    assert!(view.is_showing_altitude());
    assert!(
        !view.scene().is_showing(),
        "look-around must be demoted when altitude is shown"
    );
    // The scene is still available, only hidden.
    assert!(view.scene().is_offered());
}

#[test]
fn showing_look_around_hides_altitude() {
    let mut view = view_with_available_scene();
    view.toggle_altitude();
    assert!(view.is_showing_altitude());

    view.toggle_look_around();
    assert!(view.scene().is_showing());
    assert!(
        !view.is_showing_altitude(),
        "altitude must be hidden when look-around is shown"
    );
}

#[test]
fn toggles_invert_their_own_state() {
    let mut view = view_with_available_scene();
    view.toggle_look_around();
    view.toggle_look_around();
    assert!(!view.scene().is_showing());
    assert!(view.scene().is_offered());

    view.toggle_altitude();
    view.toggle_altitude();
    assert!(!view.is_showing_altitude());
}

#[test]
fn altitude_is_not_offerable_below_two_fixes() {
    let mut view = MapViewController::new(DisplayPreferences::default());
    let _ = view.select_node(Some(tracked_node(1, 1)));
    assert!(!view.altitude_offerable());
    view.toggle_altitude();
    assert!(!view.is_showing_altitude());

    let _ = view.select_node(Some(tracked_node(1, 2)));
    assert!(view.altitude_offerable());
}

#[test]
fn node_change_resets_both_overlays() {
    let mut view = view_with_available_scene();
    view.toggle_altitude();
    assert!(view.is_showing_altitude());

    let request = view.select_node(Some(tracked_node(10, 2)));
    assert!(request.is_some(), "node change re-triggers the fetch");
    assert!(!view.is_showing_altitude());
    assert_eq!(view.scene(), &SceneState::Fetching);
}
