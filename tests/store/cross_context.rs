use std::sync::{Arc, Mutex};

use engagement_store::{ChangeNotice, ChangeOrigin, NamespaceKind, Substrate, VisitDetails};

use crate::support::{two_tabs, Recorder};

#[test]
fn write_in_one_tab_notifies_the_other() {
    let (tab_a, tab_b, _origin) = two_tabs();
    let recorder = Recorder::new();
    tab_b
        .subscribe(NamespaceKind::Interactions, recorder.handler())
        .unwrap();

    tab_a.interactions().toggle_like("venue-1").unwrap();

    assert_eq!(
        recorder.notices(),
        vec![ChangeNotice {
            key: tab_b.key_for(NamespaceKind::Interactions),
            origin: ChangeOrigin::Remote,
        }]
    );
}

#[test]
fn writer_tab_hears_local_only_once() {
    let (tab_a, _tab_b, _origin) = two_tabs();
    let recorder = Recorder::new();
    tab_a.subscribe_all(recorder.handler()).unwrap();

    tab_a.collections().add_saved("venue-1", None).unwrap();

    let notices = recorder.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].origin, ChangeOrigin::Local);
}

#[test]
fn handler_rereads_fresh_state() {
    let (tab_a, tab_b, _origin) = two_tabs();
    let seen_likes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen_likes);
    let reader = tab_b.interactions();
    tab_b
        .subscribe(NamespaceKind::Interactions, move |_| {
            let record = reader.peek("venue-1").unwrap();
            sink.lock().unwrap().push(record.like_count);
        })
        .unwrap();

    tab_a.interactions().toggle_like("venue-1").unwrap();
    tab_a.interactions().increment_like("venue-1").unwrap();

    assert_eq!(*seen_likes.lock().unwrap(), vec![1, 2]);
}

#[test]
fn unsubscribed_tab_stops_hearing() {
    let (tab_a, tab_b, _origin) = two_tabs();
    let recorder = Recorder::new();
    let subscription = tab_b
        .subscribe(NamespaceKind::SavedItems, recorder.handler())
        .unwrap();

    tab_a.collections().add_saved("venue-1", None).unwrap();
    assert!(subscription.unsubscribe().unwrap());
    tab_a.collections().add_saved("venue-2", None).unwrap();

    assert_eq!(recorder.len(), 1);
}

#[test]
fn tabs_share_collections() {
    let (tab_a, tab_b, _origin) = two_tabs();

    tab_a
        .collections()
        .record_visit("venue-1", VisitDetails::new().category("cafe").rating(4))
        .unwrap();
    tab_b
        .collections()
        .record_visit("venue-1", VisitDetails::new().location("harbour"))
        .unwrap();

    let visits = tab_a.collections().list_visits().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].category.as_deref(), Some("cafe"));
    assert_eq!(visits[0].location.as_deref(), Some("harbour"));
}

#[test]
fn sequential_writes_from_both_tabs_accumulate() {
    let (tab_a, tab_b, _origin) = two_tabs();

    tab_b.interactions().toggle_save("venue-2").unwrap();
    tab_a.interactions().toggle_like("venue-1").unwrap();

    let records = tab_b.interactions().records().unwrap();
    assert!(records["venue-1"].is_liked);
    assert!(records["venue-2"].is_saved);
}

#[test]
fn stale_table_written_back_loses_the_other_update() {
    let (tab_a, tab_b, origin) = two_tabs();
    let key = tab_a.key_for(NamespaceKind::Interactions);
    tab_a.interactions().toggle_like("venue-1").unwrap();

    // A context holding an old copy of the table overwrites a newer one.
    let stale = tab_a.substrate().get(&key).unwrap().unwrap();
    tab_b.interactions().toggle_like("venue-2").unwrap();
    origin.context().set(&key, stale).unwrap();

    let records = tab_b.interactions().records().unwrap();
    assert!(records.contains_key("venue-1"));
    assert!(!records.contains_key("venue-2"));
}

#[test]
fn separate_origins_do_not_interact() {
    let (tab_a, _tab_b, _origin) = two_tabs();
    let (other, _other_b, _other_origin) = two_tabs();
    let recorder = Recorder::new();
    other.subscribe_all(recorder.handler()).unwrap();

    tab_a.interactions().toggle_like("venue-1").unwrap();

    assert_eq!(recorder.len(), 0);
    assert!(other.interactions().records().unwrap().is_empty());
}
