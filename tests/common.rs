//! Test utilities & fixtures.
//! Builders for node records with deterministic position histories.

use chrono::{DateTime, Utc};
use meshmap::model::{Coordinate, Node, Position, UserProfile};

/// Build a node with `fixes` chronological positions walking north-east from a
/// fixed origin, one fix per minute.
pub fn tracked_node(num: u32, fixes: usize) -> Node {
    let mut node = Node::new(num);
    node.user = Some(UserProfile {
        long_name: format!("Node {num:08x}"),
        short_name: format!("N{num:02x}"),
    });
    for i in 0..fixes {
        node.record_position(Position {
            coordinate: Coordinate::new(47.60 + i as f64 * 0.002, -122.30 + i as f64 * 0.002),
            altitude: 100 + i as i32 * 5,
            time: base_time() + chrono::Duration::minutes(i as i64),
        });
    }
    node
}

pub fn base_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
}
