use chrono::Duration;

use engagement_store::{ChangeOrigin, Clock, InteractionRecord, NamespaceKind, Substrate};

use crate::support::{single_tab, Recorder};

#[test]
fn double_toggle_restores_persisted_bytes() {
    let (store, _) = single_tab();
    let interactions = store.interactions();
    interactions.record_view("venue-1").unwrap();
    let key = store.key_for(NamespaceKind::Interactions);
    let bytes_before = store.substrate().get(&key).unwrap();

    assert!(interactions.toggle_like("venue-1").unwrap());
    assert!(!interactions.toggle_like("venue-1").unwrap());
    assert!(interactions.toggle_save("venue-1").unwrap());
    assert!(!interactions.toggle_save("venue-1").unwrap());

    assert!(bytes_before.is_some());
    assert_eq!(store.substrate().get(&key).unwrap(), bytes_before);
}

#[test]
fn toggle_like_tracks_flag_and_count() {
    let (store, _) = single_tab();
    let interactions = store.interactions();

    assert!(interactions.toggle_like("star-venue").unwrap());
    let record = interactions.get("star-venue").unwrap();
    assert!(record.is_liked);
    assert_eq!(record.like_count, 21);
    assert_eq!(record.view_count, 100);
}

#[test]
fn no_decrement_sequence_goes_below_zero() {
    let (store, _) = single_tab();
    let interactions = store.interactions();
    interactions.increment_like("venue-1").unwrap();

    for _ in 0..5 {
        interactions.decrement_like("venue-1").unwrap();
        interactions.decrement_save("venue-1").unwrap();
    }

    let record = interactions.get("venue-1").unwrap();
    assert_eq!(record.like_count, 0);
    assert_eq!(record.save_count, 0);
}

#[test]
fn views_within_window_count_once() {
    let (store, clock) = single_tab();
    let interactions = store.interactions();

    interactions.record_view("venue-1").unwrap();
    clock.advance(Duration::seconds(9));
    interactions.record_view("venue-1").unwrap();

    assert_eq!(interactions.get("venue-1").unwrap().view_count, 1);
}

#[test]
fn views_beyond_window_count_twice() {
    let (store, clock) = single_tab();
    let interactions = store.interactions();

    interactions.record_view("venue-1").unwrap();
    clock.advance(Duration::seconds(11));
    interactions.record_view("venue-1").unwrap();

    let record = interactions.get("venue-1").unwrap();
    assert_eq!(record.view_count, 2);
    assert_eq!(record.last_viewed_at, Some(clock.now()));
}

#[test]
fn every_mutation_publishes_the_namespace() {
    let (store, clock) = single_tab();
    let recorder = Recorder::new();
    store
        .subscribe(NamespaceKind::Interactions, recorder.handler())
        .unwrap();
    let interactions = store.interactions();

    interactions.toggle_like("venue-1").unwrap();
    interactions.toggle_save("venue-1").unwrap();
    interactions.increment_like("venue-1").unwrap();
    interactions.record_view("venue-1").unwrap();
    assert_eq!(recorder.len(), 4);

    // Throttled view changes nothing and stays quiet.
    clock.advance(Duration::seconds(1));
    interactions.record_view("venue-1").unwrap();
    assert_eq!(recorder.len(), 4);

    interactions.reset("venue-1").unwrap();
    interactions.reset_all().unwrap();
    let notices = recorder.notices();
    assert_eq!(notices.len(), 6);
    assert!(notices.iter().all(|n| n.origin == ChangeOrigin::Local));
    assert!(notices
        .iter()
        .all(|n| n.key == store.key_for(NamespaceKind::Interactions)));
}

#[test]
fn lazy_get_does_not_publish() {
    let (store, _) = single_tab();
    let recorder = Recorder::new();
    store.subscribe_all(recorder.handler()).unwrap();

    assert_eq!(
        store.interactions().get("venue-9").unwrap(),
        InteractionRecord::default()
    );
    assert_eq!(recorder.len(), 0);
    assert!(store
        .interactions()
        .tracked_ids()
        .unwrap()
        .contains(&"venue-9".to_string()));
}
