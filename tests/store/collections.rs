use engagement_store::{NamespaceKind, StoreError, TastePattern, VisitDetails};

use crate::support::{single_tab, Recorder};

#[test]
fn saving_twice_keeps_one_entry() {
    let (store, _) = single_tab();
    let collections = store.collections();

    collections.add_saved("venue-1", None).unwrap();
    collections.add_saved("venue-1", Some("second try")).unwrap();

    let saved = collections.list_saved().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].item_id, "venue-1");
    assert_eq!(saved[0].notes, None);
}

#[test]
fn idempotent_calls_do_not_publish() {
    let (store, _) = single_tab();
    let recorder = Recorder::new();
    store
        .subscribe(NamespaceKind::SavedItems, recorder.handler())
        .unwrap();
    let collections = store.collections();

    collections.add_saved("venue-1", None).unwrap();
    collections.add_saved("venue-1", None).unwrap();
    collections.remove_saved("venue-2").unwrap();

    assert_eq!(recorder.len(), 1);
}

#[test]
fn visit_replacement_keeps_unsupplied_fields() {
    let (store, _) = single_tab();
    let collections = store.collections();

    collections
        .record_visit(
            "venue-1",
            VisitDetails::new().category("catA").location("locA").rating(3),
        )
        .unwrap();
    collections
        .record_visit("venue-1", VisitDetails::new().category("catB"))
        .unwrap();

    let visits = collections.list_visits().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].category.as_deref(), Some("catB"));
    assert_eq!(visits[0].location.as_deref(), Some("locA"));
    assert_eq!(visits[0].rating, Some(3));
}

#[test]
fn invalid_rating_is_an_error() {
    let (store, _) = single_tab();
    let err = store
        .collections()
        .record_visit("venue-1", VisitDetails::new().rating(9))
        .unwrap_err();
    assert_eq!(err, StoreError::InvalidRating(9));
}

/// Record `count` visits to distinct items cycling through `categories`
/// categories, rating the first `ratings.len()` of them.
fn visit_many(
    collections: &engagement_store::CollectionStore<engagement_store::ContextSubstrate>,
    count: usize,
    categories: usize,
    ratings: &[u8],
) {
    for n in 0..count {
        let mut details = VisitDetails::new()
            .category(format!("category-{}", n % categories))
            .location(format!("district-{}", n % 2));
        if let Some(rating) = ratings.get(n) {
            details = details.rating(*rating);
        }
        collections
            .record_visit(&format!("venue-{}", n), details)
            .unwrap();
    }
}

#[test]
fn taste_scenarios() {
    let cases: [(usize, usize, &[u8], TastePattern); 5] = [
        (12, 6, &[], TastePattern::Adventurous),
        (8, 2, &[], TastePattern::Traditional),
        (3, 3, &[5, 5, 4], TastePattern::Gourmet),
        (3, 3, &[], TastePattern::Casual),
        (7, 4, &[4, 4, 4, 4, 4, 4, 4], TastePattern::Balanced),
    ];

    for (count, categories, ratings, expected) in cases {
        let (store, _) = single_tab();
        let collections = store.collections();
        visit_many(&collections, count, categories, ratings);

        let analysis = collections.taste_analysis().unwrap().unwrap();
        assert_eq!(analysis.visit_frequency, count as u64);
        assert_eq!(analysis.unique_categories(), categories);
        assert_eq!(analysis.taste_pattern, expected, "{} visits", count);
    }
}

#[test]
fn analysis_counts_locations() {
    let (store, _) = single_tab();
    let collections = store.collections();
    visit_many(&collections, 5, 3, &[]);

    let analysis = collections.taste_analysis().unwrap().unwrap();
    assert_eq!(analysis.favorite_locations["district-0"], 3);
    assert_eq!(analysis.favorite_locations["district-1"], 2);
    assert_eq!(analysis.top_locations(1), vec![("district-0", 3)]);
}

#[test]
fn empty_history_keeps_previous_analysis() {
    let (store, _) = single_tab();
    let collections = store.collections();
    visit_many(&collections, 3, 3, &[5, 5, 4]);
    let before = collections.taste_analysis().unwrap();

    collections.clear_visits().unwrap();

    assert_eq!(collections.taste_analysis().unwrap(), before);
}

#[test]
fn liked_set_and_like_counter_are_independent() {
    let (store, _) = single_tab();

    store.collections().add_liked("venue-1").unwrap();

    assert!(store.collections().is_liked("venue-1").unwrap());
    assert!(!store.interactions().get("venue-1").unwrap().is_liked);
}

#[test]
fn store_reset_all_empties_every_namespace() {
    let (store, _) = single_tab();
    store.interactions().toggle_like("venue-1").unwrap();
    store.collections().add_saved("venue-1", None).unwrap();
    store
        .collections()
        .record_visit("venue-1", VisitDetails::new().category("cafe"))
        .unwrap();
    assert!(!store.substrate().origin().is_empty().unwrap());

    store.reset_all().unwrap();

    assert!(store.substrate().origin().is_empty().unwrap());
}
