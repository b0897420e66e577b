//! Camera framing derivation: a pure function of a node's position history.

use crate::model::{Coordinate, Node};

/// Camera distance used when centering on a node with a single fix, meters.
pub const CENTERED_DISTANCE_METERS: f64 = 8000.0;
/// Camera pitch used when centering on a node with a single fix, degrees from vertical.
pub const CENTERED_PITCH_DEGREES: f64 = 60.0;
/// Camera heading used when centering on a node with a single fix, degrees true.
pub const CENTERED_HEADING_DEGREES: f64 = 0.0;

/// How the map camera should frame the selected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraFraming {
    /// The node has no recorded positions; the caller shows an empty-state
    /// indicator and nothing else is derived.
    Unavailable,
    /// Automatic framing encompassing the node's full position history.
    FitAll,
    /// Fixed oblique framing centered on the node's only fix.
    Centered {
        coordinate: Coordinate,
        distance: f64,
        pitch: f64,
        heading: f64,
    },
}

/// Derive the camera framing for a node.
///
/// Zero positions yields [`CameraFraming::Unavailable`]; more than one yields
/// [`CameraFraming::FitAll`]; exactly one centers on that fix at the fixed
/// distance/pitch/heading constants. The constants are presentation policy,
/// not derived from the data.
pub fn derive_camera(node: &Node) -> CameraFraming {
    match node.positions.as_slice() {
        [] => CameraFraming::Unavailable,
        [only] => CameraFraming::Centered {
            coordinate: only.coordinate,
            distance: CENTERED_DISTANCE_METERS,
            pitch: CENTERED_PITCH_DEGREES,
            heading: CENTERED_HEADING_DEGREES,
        },
        _ => CameraFraming::FitAll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use chrono::{DateTime, Utc};

    fn node_with_fixes(count: usize) -> Node {
        let mut node = Node::new(0xdead);
        for i in 0..count {
            node.record_position(Position {
                coordinate: Coordinate::new(47.0 + i as f64 * 0.01, -121.0),
                altitude: 300,
                time: DateTime::<Utc>::from_timestamp(1_700_000_000 + i as i64, 0).unwrap(),
            });
        }
        node
    }

    #[test]
    fn no_positions_is_unavailable() {
        assert_eq!(
            derive_camera(&node_with_fixes(0)),
            CameraFraming::Unavailable
        );
    }

    #[test]
    fn single_position_centers_with_fixed_constants() {
        let node = node_with_fixes(1);
        match derive_camera(&node) {
            CameraFraming::Centered {
                coordinate,
                distance,
                pitch,
                heading,
            } => {
                assert_eq!(coordinate, node.latest_position().unwrap().coordinate);
                assert_eq!(distance, 8000.0);
                assert_eq!(pitch, 60.0);
                assert_eq!(heading, 0.0);
            }
            other => panic!("expected centered framing, got {other:?}"),
        }
    }

    #[test]
    fn multiple_positions_fit_all_regardless_of_count() {
        for count in [2usize, 3, 17, 500] {
            assert_eq!(
                derive_camera(&node_with_fixes(count)),
                CameraFraming::FitAll,
                "count {count}"
            );
        }
    }
}
