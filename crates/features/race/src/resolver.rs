use crate::error::RaceError;
use chrono::{DateTime, TimeDelta, Utc};
use dropcatch_domain::config::LatencyMode;
use dropcatch_domain::{Competitor, CompetitorId, DropId};
use dropcatch_store::{DropGuard, Store};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A connected client competing with zero simulated latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveClaimant {
    pub name: String,
}

impl LiveClaimant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "competitor_id", rename_all = "snake_case")]
pub enum ContenderKind {
    Registered(CompetitorId),
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contender {
    pub kind: ContenderKind,
    pub name: String,
    pub delay_ms: u64,
}

impl Contender {
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self.kind, ContenderKind::Live)
    }
}

impl From<Competitor> for Contender {
    fn from(competitor: Competitor) -> Self {
        Self {
            kind: ContenderKind::Registered(competitor.id),
            name: competitor.name,
            delay_ms: competitor.delay_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Won,
    AlreadyTaken,
}

/// One atomic create attempt, stamped at `race start + delay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimAttempt {
    pub contender: Contender,
    pub at: DateTime<Utc>,
    pub result: AttemptResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceOutcome {
    pub drop_id: DropId,
    pub winner: Option<Contender>,
    pub attempts: Vec<ClaimAttempt>,
}

impl RaceOutcome {
    /// `true` when the live claimant is the recorded winner.
    #[must_use]
    pub fn live_won(&self) -> bool {
        self.winner.as_ref().is_some_and(Contender::is_live)
    }
}

/// Runs races against the shared store.
#[derive(Debug, Clone)]
pub struct RaceResolver {
    store: Store,
    latency: LatencyMode,
}

impl RaceResolver {
    #[must_use]
    pub const fn new(store: Store, latency: LatencyMode) -> Self {
        Self { store, latency }
    }

    #[must_use]
    pub const fn latency(&self) -> LatencyMode {
        self.latency
    }

    /// Locks the drop and races its competitors (plus `live`, when given).
    ///
    /// # Errors
    /// [`RaceError::InvalidState`] when the drop is no longer pending, or a store error
    /// when the drop does not exist.
    pub async fn resolve(
        &self,
        drop_id: DropId,
        live: Option<LiveClaimant>,
        now: DateTime<Utc>,
    ) -> Result<RaceOutcome, RaceError> {
        let guard = self.store.lock_drop(drop_id).await;
        self.resolve_locked(&guard, live, now).await
    }

    /// Same as [`RaceResolver::resolve`] for a caller that already holds the drop lock.
    ///
    /// Contenders are walked in ascending delay; the first one whose atomic create
    /// succeeds wins and the drop is marked captured. Without a winner the drop is
    /// left pending for the caller to decide on.
    #[instrument(skip(self, guard, live), fields(drop_id = %guard.drop_id()), err)]
    pub async fn resolve_locked(
        &self,
        guard: &DropGuard,
        live: Option<LiveClaimant>,
        now: DateTime<Utc>,
    ) -> Result<RaceOutcome, RaceError> {
        let drop = self.store.get_drop(guard.drop_id())?;
        if !drop.is_pending() {
            return Err(RaceError::InvalidState {
                id: drop.id,
                status: drop.status.as_str().into(),
                context: None,
            });
        }

        let contenders = order_contenders(self.store.competitors_of(drop.id), live);
        let mut attempts = Vec::with_capacity(contenders.len());
        let mut winner = None;
        let mut elapsed_ms = 0;

        for contender in contenders {
            if self.latency == LatencyMode::RealTime {
                let wait = contender.delay_ms.saturating_sub(elapsed_ms);
                tokio::time::sleep(Duration::from_millis(wait)).await;
            }
            elapsed_ms = contender.delay_ms;

            let at = offset(now, contender.delay_ms);
            if self.store.create_domain_if_absent(&drop.domain, at) {
                self.store.mark_captured(guard, &contender.name)?;
                info!(domain = %drop.domain, winner = %contender.name, delay_ms = contender.delay_ms, "Drop captured");
                attempts.push(ClaimAttempt { contender: contender.clone(), at, result: AttemptResult::Won });
                winner = Some(contender);
                break;
            }

            debug!(domain = %drop.domain, contender = %contender.name, "Domain already taken");
            attempts.push(ClaimAttempt { contender, at, result: AttemptResult::AlreadyTaken });
        }

        Ok(RaceOutcome { drop_id: drop.id, winner, attempts })
    }
}

/// Registered competitors in registration order, then the live claimant, stably sorted by
/// delay. Ties therefore keep registration order and the live claimant comes last among
/// equal delays.
#[must_use]
pub fn order_contenders(
    competitors: Vec<Competitor>,
    live: Option<LiveClaimant>,
) -> Vec<Contender> {
    let mut contenders: Vec<Contender> = competitors.into_iter().map(Contender::from).collect();
    if let Some(live) = live {
        contenders.push(Contender { kind: ContenderKind::Live, name: live.name, delay_ms: 0 });
    }
    contenders.sort_by_key(|contender| contender.delay_ms);
    contenders
}

fn offset(now: DateTime<Utc>, delay_ms: u64) -> DateTime<Utc> {
    i64::try_from(delay_ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn competitor(id: u64, delay_ms: u64) -> Competitor {
        Competitor {
            id: CompetitorId(id),
            drop_id: DropId(1),
            name: format!("c{id}"),
            attempts: 1,
            delay_ms,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_live_claimant_is_last_among_zero_delays() {
        let ordered = order_contenders(
            vec![competitor(1, 0), competitor(2, 50)],
            Some(LiveClaimant::new("You")),
        );
        let kinds: Vec<_> = ordered.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                ContenderKind::Registered(CompetitorId(1)),
                ContenderKind::Live,
                ContenderKind::Registered(CompetitorId(2)),
            ]
        );
    }

    #[test]
    fn test_offset_saturates() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(offset(now, 1500), now + TimeDelta::milliseconds(1500));
        assert_eq!(offset(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
    }

    proptest! {
        #[test]
        fn prop_order_is_stable_by_delay(delays in prop::collection::vec(0u64..500, 0..24)) {
            let competitors: Vec<_> = delays
                .iter()
                .enumerate()
                .map(|(i, &d)| competitor(i as u64 + 1, d))
                .collect();
            let ordered = order_contenders(competitors, None);

            for pair in ordered.windows(2) {
                prop_assert!(pair[0].delay_ms <= pair[1].delay_ms);
                if pair[0].delay_ms == pair[1].delay_ms {
                    let (ContenderKind::Registered(a), ContenderKind::Registered(b)) =
                        (pair[0].kind, pair[1].kind)
                    else {
                        unreachable!("no live claimant was added");
                    };
                    prop_assert!(a < b);
                }
            }
        }
    }
}
