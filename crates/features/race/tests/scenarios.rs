use chrono::{DateTime, Duration, TimeZone, Utc};
use dropcatch_domain::config::LatencyMode;
use dropcatch_domain::{DomainName, DropId, DropStatus};
use dropcatch_kernel::{ManualClock, SharedClock};
use dropcatch_race::*;
use dropcatch_store::{NewCompetitor, NewDrop, Store};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn name(raw: &str) -> DomainName {
    DomainName::parse(raw).unwrap()
}

struct Harness {
    store: Store,
    resolver: RaceResolver,
    sweeper: Sweeper,
}

fn harness(latency: LatencyMode) -> Harness {
    let store = Store::new();
    let resolver = RaceResolver::new(store.clone(), latency);
    let clock: SharedClock = Arc::new(ManualClock::new(t0()));
    let sweeper = Sweeper::new(store.clone(), resolver.clone(), clock);
    Harness { store, resolver, sweeper }
}

async fn drop_with(store: &Store, domain: &str, grace: u32, competitors: &[(&str, u64)]) -> DropId {
    let drop = store.insert_drop(NewDrop::new(name(domain), t0(), grace), t0());
    let guard = store.lock_drop(drop.id).await;
    for (who, delay) in competitors {
        store.insert_competitor(&guard, NewCompetitor::new(*who, 1, *delay), t0()).unwrap();
    }
    drop.id
}

#[tokio::test]
async fn test_fastest_competitor_wins_sweep() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "example.com", 5, &[("A", 300), ("B", 100)]).await;

    let report = h.sweeper.sweep_once(t0() + Duration::seconds(1)).await;

    assert_eq!(report.resolved(), 1);
    assert_eq!(report.captured[0].winner, "B");
    let drop = h.store.get_drop(id).unwrap();
    assert_eq!(drop.status, DropStatus::Captured);
    assert_eq!(drop.winner.as_deref(), Some("B"));
    assert!(h.store.domain_exists(&name("example.com")));
}

#[tokio::test]
async fn test_zero_competitors_missed_only_after_grace() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "lonely.net", 5, &[]).await;

    let early = h.sweeper.sweep_once(t0() + Duration::minutes(4)).await;
    assert_eq!(early.resolved(), 0);
    assert_eq!(early.pending, vec![id]);
    assert_eq!(h.store.get_drop(id).unwrap().status, DropStatus::Pending);

    let late = h.sweeper.sweep_once(t0() + Duration::minutes(6)).await;
    assert_eq!(late.missed, vec![id]);
    assert_eq!(h.store.get_drop(id).unwrap().status, DropStatus::Missed);
    assert!(!h.store.domain_exists(&name("lonely.net")));
}

#[tokio::test]
async fn test_sweep_is_idempotent_and_skips_future() {
    let h = harness(LatencyMode::Virtual);
    drop_with(&h.store, "once.org", 5, &[("solo", 10)]).await;
    let future = h.store.insert_drop(NewDrop::new(name("later.org"), t0() + Duration::hours(1), 5), t0());

    assert_eq!(h.sweeper.sweep_once(t0()).await.resolved(), 1);
    let again = h.sweeper.sweep_once(t0()).await;
    assert_eq!(again.examined, 0);
    assert_eq!(again.resolved(), 0);
    assert_eq!(h.store.get_drop(future.id).unwrap().status, DropStatus::Pending);
}

#[tokio::test]
async fn test_second_resolution_is_rejected() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "twice.io", 5, &[("a", 5)]).await;

    h.resolver.resolve(id, None, t0()).await.unwrap();
    let err = h.resolver.resolve(id, None, t0()).await.unwrap_err();
    assert!(matches!(err, RaceError::InvalidState { .. }));
}

#[tokio::test]
async fn test_live_claimant_beats_slower_competitors() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "live.uk", 5, &[("bot", 40)]).await;

    let outcome = h.resolver.resolve(id, Some(LiveClaimant::new("You")), t0()).await.unwrap();

    assert!(outcome.live_won());
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.attempts[0].at, t0());
    assert_eq!(h.store.get_drop(id).unwrap().winner.as_deref(), Some("You"));
}

#[tokio::test]
async fn test_zero_delay_competitor_beats_live_claimant() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "tie.eu", 5, &[("instant", 0)]).await;

    let outcome = h.resolver.resolve(id, Some(LiveClaimant::new("You")), t0()).await.unwrap();

    assert!(!outcome.live_won());
    assert_eq!(outcome.winner.map(|w| w.name).as_deref(), Some("instant"));
}

#[tokio::test]
async fn test_existing_domain_leaves_drop_pending_until_grace() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "taken.co", 5, &[("a", 10), ("b", 20)]).await;
    assert!(h.store.create_domain_if_absent(&name("taken.co"), t0()));

    let outcome = h.resolver.resolve(id, None, t0()).await.unwrap();
    assert!(outcome.winner.is_none());
    assert!(outcome.attempts.iter().all(|a| a.result == AttemptResult::AlreadyTaken));
    assert_eq!(h.store.get_drop(id).unwrap().status, DropStatus::Pending);

    let report = h.sweeper.sweep_once(t0() + Duration::minutes(5)).await;
    assert_eq!(report.missed, vec![id]);
}

#[tokio::test(start_paused = true)]
async fn test_real_time_mode_sleeps_until_winner() {
    let h = harness(LatencyMode::RealTime);
    let id = drop_with(&h.store, "paced.info", 5, &[("slow", 300), ("fast", 100)]).await;

    let started = tokio::time::Instant::now();
    let outcome = h.resolver.resolve(id, None, t0()).await.unwrap();
    let waited = started.elapsed();

    assert_eq!(outcome.winner.map(|w| w.name).as_deref(), Some("fast"));
    assert!(waited >= std::time::Duration::from_millis(100));
    assert!(waited < std::time::Duration::from_millis(300));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_record_one_winner() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "contested.com", 5, &[("x", 10), ("y", 10)]).await;

    let live = {
        let resolver = h.resolver.clone();
        tokio::spawn(async move { resolver.resolve(id, Some(LiveClaimant::new("You")), t0()).await })
    };
    let sweep = {
        let sweeper = h.sweeper.clone();
        tokio::spawn(async move { sweeper.sweep_once(t0()).await })
    };

    let live = live.await.unwrap();
    let report = sweep.await.unwrap();

    let winners = usize::from(live.as_ref().is_ok_and(|o| o.winner.is_some())) + report.captured.len();
    assert_eq!(winners, 1);
    assert!(report.errors.is_empty());
    assert_eq!(h.store.get_drop(id).unwrap().status, DropStatus::Captured);
}

#[tokio::test]
async fn test_run_loop_stops_on_cancel() {
    let h = harness(LatencyMode::Virtual);
    let id = drop_with(&h.store, "loop.io", 5, &[("a", 1)]).await;
    let shutdown = CancellationToken::new();

    let task = tokio::spawn(h.sweeper.clone().run(std::time::Duration::from_millis(10), shutdown.clone()));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    shutdown.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(1), task).await.unwrap().unwrap();
    assert_eq!(h.store.get_drop(id).unwrap().status, DropStatus::Captured);
}
