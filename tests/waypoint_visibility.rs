//! Waypoint expiry filtering through the node directory.

use chrono::{Duration, Utc};
use meshmap::model::{Coordinate, Waypoint};
use meshmap::storage::Storage;
use tempfile::tempdir;

fn waypoint(id: u32, name: &str, expire: Option<chrono::DateTime<Utc>>) -> Waypoint {
    Waypoint {
        id,
        name: name.to_string(),
        coordinate: Coordinate::new(47.61, -122.33),
        expire,
    }
}

#[tokio::test]
async fn expiry_is_evaluated_at_query_time() {
    let tmp = tempdir().unwrap();
    let mut storage = Storage::new(tmp.path()).await.unwrap();
    let now = Utc::now();

    storage
        .upsert_waypoint(waypoint(1, "permanent", None))
        .await
        .unwrap();
    storage
        .upsert_waypoint(waypoint(2, "expired", Some(now - Duration::seconds(1))))
        .await
        .unwrap();
    storage
        .upsert_waypoint(waypoint(3, "active", Some(now + Duration::seconds(1))))
        .await
        .unwrap();

    let visible: Vec<u32> = storage.visible_waypoints(now).iter().map(|w| w.id).collect();
    assert_eq!(visible, vec![1, 3]);

    // The same records queried later give a different answer: nothing is cached.
    let later = now + Duration::seconds(2);
    let visible_later: Vec<u32> = storage
        .visible_waypoints(later)
        .iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(visible_later, vec![1]);
}

#[tokio::test]
async fn expired_waypoints_are_retained_not_deleted() {
    let tmp = tempdir().unwrap();
    let mut storage = Storage::new(tmp.path()).await.unwrap();
    let now = Utc::now();
    storage
        .upsert_waypoint(waypoint(9, "old", Some(now - Duration::hours(1))))
        .await
        .unwrap();
    assert_eq!(storage.waypoint_count(), 1);
    assert!(storage.visible_waypoints(now).is_empty());
}
