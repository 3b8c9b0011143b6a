use crate::error::RaceError;
use crate::resolver::RaceResolver;
use chrono::{DateTime, Utc};
use dropcatch_domain::DropId;
use dropcatch_kernel::SharedClock;
use dropcatch_store::Store;
use serde::Serialize;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedDrop {
    pub drop_id: DropId,
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub drop_id: DropId,
    pub error: String,
}

/// What one sweep pass did to each due drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub swept_at: DateTime<Utc>,
    pub examined: usize,
    pub captured: Vec<CapturedDrop>,
    pub missed: Vec<DropId>,
    /// Due but still inside the grace window.
    pub pending: Vec<DropId>,
    pub errors: Vec<SweepFailure>,
}

impl SweepReport {
    const fn new(swept_at: DateTime<Utc>) -> Self {
        Self {
            swept_at,
            examined: 0,
            captured: Vec::new(),
            missed: Vec::new(),
            pending: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Number of drops that left `pending` in this pass.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.captured.len() + self.missed.len()
    }
}

enum SweepAction {
    Captured(String),
    Missed,
    StillPending,
    Skipped,
}

/// Resolves elapsed drops without a live claimant.
#[derive(Debug, Clone)]
pub struct Sweeper {
    store: Store,
    resolver: RaceResolver,
    clock: SharedClock,
}

impl Sweeper {
    #[must_use]
    pub const fn new(store: Store, resolver: RaceResolver, clock: SharedClock) -> Self {
        Self { store, resolver, clock }
    }

    /// One pass over every pending drop with `drop_time <= now`.
    ///
    /// A failing drop is recorded in the report and never stops the pass.
    #[instrument(skip(self))]
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::new(now);

        for id in self.store.due_drops(now) {
            report.examined += 1;
            match self.sweep_drop(id, now).await {
                Ok(SweepAction::Captured(winner)) => {
                    report.captured.push(CapturedDrop { drop_id: id, winner });
                },
                Ok(SweepAction::Missed) => report.missed.push(id),
                Ok(SweepAction::StillPending) => report.pending.push(id),
                Ok(SweepAction::Skipped) => {},
                Err(e) => {
                    warn!(drop_id = %id, error = %e, "Sweep failed for drop");
                    report.errors.push(SweepFailure { drop_id: id, error: e.to_string() });
                },
            }
        }

        report
    }

    async fn sweep_drop(&self, id: DropId, now: DateTime<Utc>) -> Result<SweepAction, RaceError> {
        let guard = self.store.lock_drop(id).await;

        // Another task may have resolved it between selection and locking.
        let drop = self.store.get_drop(id)?;
        if !drop.is_pending() || !drop.is_due(now) {
            return Ok(SweepAction::Skipped);
        }

        if !self.store.competitors_of(id).is_empty() {
            let outcome = self.resolver.resolve_locked(&guard, None, now).await?;
            if let Some(winner) = outcome.winner {
                return Ok(SweepAction::Captured(winner.name));
            }
        }

        if drop.grace_elapsed(now) {
            self.store.mark_missed(&guard)?;
            info!(drop_id = %id, domain = %drop.domain, "Drop missed");
            Ok(SweepAction::Missed)
        } else {
            Ok(SweepAction::StillPending)
        }
    }

    /// Sweeps every `interval` until `shutdown` is cancelled.
    pub async fn run(self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), "Sweep loop started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let report = self.sweep_once(self.clock.now()).await;
                    if report.errors.is_empty() {
                        debug!(examined = report.examined, resolved = report.resolved(), "Sweep pass finished");
                    } else {
                        error!(
                            examined = report.examined,
                            resolved = report.resolved(),
                            failures = report.errors.len(),
                            "Sweep pass finished with failures"
                        );
                    }
                }
            }
        }

        info!("Sweep loop stopped");
    }
}
