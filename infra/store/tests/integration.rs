use chrono::{DateTime, Duration, TimeZone, Utc};
use dropcatch_domain::{CompetitorId, DomainName, DropId, DropStatus};
use dropcatch_store::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap()
}

fn schedule(store: &Store, raw: &str) -> DropId {
    let name = DomainName::parse(raw).unwrap();
    store.insert_drop(NewDrop::new(name, t0(), 5), t0()).id
}

#[tokio::test]
async fn test_status_transitions_are_monotonic() {
    let store = Store::new();
    let id = schedule(&store, "mono.com");
    let guard = store.lock_drop(id).await;

    let captured = store.mark_captured(&guard, "alpha").unwrap();
    assert_eq!(captured.status, DropStatus::Captured);
    assert_eq!(captured.winner.as_deref(), Some("alpha"));

    assert!(matches!(store.mark_captured(&guard, "beta"), Err(StoreError::InvalidState { .. })));
    assert!(matches!(store.mark_missed(&guard), Err(StoreError::InvalidState { .. })));
    assert_eq!(store.get_drop(id).unwrap().winner.as_deref(), Some("alpha"));
}

#[tokio::test]
async fn test_competitors_frozen_after_resolution() {
    let store = Store::new();
    let id = schedule(&store, "frozen.net");
    let guard = store.lock_drop(id).await;

    let first = store.insert_competitor(&guard, NewCompetitor::new("a", 1, 300), t0()).unwrap();
    let second = store.insert_competitor(&guard, NewCompetitor::new("b", 2, 100), t0()).unwrap();
    assert!(first.id < second.id);

    store.mark_missed(&guard).unwrap();
    let err = store.insert_competitor(&guard, NewCompetitor::new("c", 1, 0), t0()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidState { .. }));

    let names: Vec<_> = store.competitors_of(id).into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["a", "b"]);
}

#[tokio::test]
async fn test_missing_drop_is_reported() {
    let store = Store::new();
    let guard = store.lock_drop(DropId(404)).await;
    let err = store.insert_competitor(&guard, NewCompetitor::new("x", 1, 0), t0()).unwrap_err();
    assert!(matches!(err, StoreError::DropNotFound { id: DropId(404), .. }));
    assert_eq!(err.to_string(), "Drop not found: 404");
}

#[tokio::test]
async fn test_delay_edit_is_scoped_to_guarded_drop() {
    let store = Store::new();
    let a = schedule(&store, "a.org");
    let b = schedule(&store, "b.org");

    let competitor = {
        let guard = store.lock_drop(a).await;
        store.insert_competitor(&guard, NewCompetitor::new("slow", 1, 900), t0()).unwrap()
    };

    let guard_b = store.lock_drop(b).await;
    let err = store.set_competitor_delay(&guard_b, competitor.id, 10).unwrap_err();
    assert!(matches!(err, StoreError::CompetitorNotFound { .. }));
    drop(guard_b);

    let guard_a = store.lock_drop(a).await;
    let updated = store.set_competitor_delay(&guard_a, competitor.id, 10).unwrap();
    assert_eq!(updated.delay_ms, 10);
    assert!(store.competitor(CompetitorId(999)).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_drop_serializes() {
    let store = Store::new();
    let id = schedule(&store, "busy.io");
    let guard = store.lock_drop(id).await;

    let entered = Arc::new(AtomicBool::new(false));
    let waiter = {
        let store = store.clone();
        let entered = Arc::clone(&entered);
        tokio::spawn(async move {
            let _guard = store.lock_drop(id).await;
            entered.store(true, Ordering::SeqCst);
        })
    };

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!entered.load(Ordering::SeqCst), "second locker must wait for the first");

    drop(guard);
    waiter.await.unwrap();
    assert!(entered.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_different_drops_do_not_contend() {
    let store = Store::new();
    let a = schedule(&store, "one.eu");
    let b = schedule(&store, "two.eu");

    let _held = store.lock_drop(a).await;
    let other = tokio::time::timeout(std::time::Duration::from_secs(1), store.lock_drop(b)).await;
    assert!(other.is_ok(), "locking another drop must not block");
}

#[tokio::test]
async fn test_purge_removes_missed_with_competitors() {
    let store = Store::new();
    let missed = schedule(&store, "gone.co");
    let kept = schedule(&store, "kept.co");

    {
        let guard = store.lock_drop(missed).await;
        store.insert_competitor(&guard, NewCompetitor::new("late", 1, 50), t0()).unwrap();
        store.mark_missed(&guard).unwrap();
    }

    assert_eq!(store.purge_missed(), 1);
    assert!(store.get_drop(missed).is_err());
    assert!(store.competitors_of(missed).is_empty());
    assert!(store.get_drop(kept).is_ok());
    assert_eq!(store.purge_missed(), 0);
}

#[tokio::test]
async fn test_reschedule_only_pending() {
    let store = Store::new();
    let id = schedule(&store, "move.info");
    let guard = store.lock_drop(id).await;

    let moved = store.reschedule_drop(&guard, t0() + Duration::hours(3)).unwrap();
    assert_eq!(moved.drop_time, t0() + Duration::hours(3));

    store.mark_captured(&guard, "z").unwrap();
    assert!(store.reschedule_drop(&guard, t0()).is_err());
}
