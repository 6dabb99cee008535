use engagement_store::{merge_all, CatalogItem};

use crate::support::{single_tab, Venue};

fn catalog() -> Vec<Venue> {
    vec![
        Venue::new("star-venue", "Harbour Grill", "seafood"),
        Venue::new("venue-1", "Corner Bistro", "french"),
    ]
}

#[test]
fn project_overlays_counters_without_persisting() {
    let (store, _) = single_tab();
    let interactions = store.interactions();
    interactions.toggle_save("venue-1").unwrap();
    interactions.record_view("venue-1").unwrap();
    let items = catalog();

    let shown = interactions.project(&items).unwrap();

    assert_eq!(items, catalog());
    assert_eq!(shown[0].item_id(), "star-venue");
    assert_eq!(shown[0].view_count, 100);
    assert_eq!(shown[0].like_count, 20);
    assert!(!shown[0].is_saved);
    assert_eq!(shown[1].item.name, "Corner Bistro");
    assert_eq!(shown[1].view_count, 1);
    assert_eq!(shown[1].save_count, 1);
    assert!(shown[1].is_saved);

    // The seeded item was only read.
    assert_eq!(
        interactions.tracked_ids().unwrap(),
        vec!["venue-1".to_string()]
    );
}

#[test]
fn projection_is_repeatable() {
    let (store, _) = single_tab();
    let interactions = store.interactions();
    interactions.toggle_like("venue-1").unwrap();

    let first = interactions.project(&catalog()).unwrap();
    let second = interactions.project(&catalog()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn merge_all_with_store_lookup_serializes_flat() {
    let (store, _) = single_tab();
    let interactions = store.interactions();
    interactions.toggle_like("venue-1").unwrap();

    let shown = merge_all(&catalog(), |venue| interactions.peek(&venue.id).unwrap());
    let json = serde_json::to_value(&shown[1]).unwrap();

    assert_eq!(json["name"], "Corner Bistro");
    assert_eq!(json["category"], "french");
    assert_eq!(json["likeCount"], 1);
    assert_eq!(json["isLiked"], true);
}
