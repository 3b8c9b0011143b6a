use crate::error::StoreError;
use crate::locks::{DropGuard, DropLocks};
use crate::query::{DropListing, DropQuery, SortField, SortOrder};
use chrono::{DateTime, Utc};
use dropcatch_domain::{
    Competitor, CompetitorId, Domain, DomainName, Drop, DropId, DropStatus,
};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Attributes of a drop about to be scheduled.
#[derive(Debug, Clone)]
pub struct NewDrop {
    pub domain: DomainName,
    pub drop_time: DateTime<Utc>,
    pub grace_minutes: u32,
}

impl NewDrop {
    #[must_use]
    pub const fn new(domain: DomainName, drop_time: DateTime<Utc>, grace_minutes: u32) -> Self {
        Self { domain, drop_time, grace_minutes }
    }
}

#[derive(Debug, Clone)]
pub struct NewCompetitor {
    pub name: String,
    pub attempts: u32,
    pub delay_ms: u64,
}

impl NewCompetitor {
    pub fn new(name: impl Into<String>, attempts: u32, delay_ms: u64) -> Self {
        Self { name: name.into(), attempts, delay_ms }
    }
}

#[derive(Debug, Default)]
struct Tables {
    domains: FxHashMap<DomainName, Domain>,
    drops: BTreeMap<DropId, Drop>,
    competitors: BTreeMap<CompetitorId, Competitor>,
    next_drop: u64,
    next_competitor: u64,
}

impl Tables {
    fn drop_mut(&mut self, id: DropId) -> Result<&mut Drop, StoreError> {
        self.drops.get_mut(&id).ok_or(StoreError::DropNotFound { id, context: None })
    }

    fn pending_drop_mut(&mut self, id: DropId) -> Result<&mut Drop, StoreError> {
        let drop = self.drop_mut(id)?;
        if !drop.is_pending() {
            return Err(StoreError::InvalidState {
                message: format!("drop {id} is {}", drop.status).into(),
                context: None,
            });
        }
        Ok(drop)
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    tables: RwLock<Tables>,
    locks: DropLocks,
}

/// Thread-safe, cheaply cloneable handle to the shared tables.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    ///
    /// The drop does not need to exist; callers re-read it under the guard.
    pub async fn lock_drop(&self, id: DropId) -> DropGuard {
        self.inner.locks.acquire(id).await
    }

    // --- Domains ---

    #[must_use]
    pub fn domain_exists(&self, name: &DomainName) -> bool {
        self.inner.tables.read().domains.contains_key(name)
    }

    #[must_use]
    pub fn domain(&self, name: &DomainName) -> Option<Domain> {
        self.inner.tables.read().domains.get(name).cloned()
    }

    /// Atomically creates the domain; returns `false` if it already existed.
    pub fn create_domain_if_absent(&self, name: &DomainName, at: DateTime<Utc>) -> bool {
        let mut tables = self.inner.tables.write();
        if tables.domains.contains_key(name) {
            return false;
        }
        tables.domains.insert(name.clone(), Domain { name: name.clone(), created_at: at });
        debug!(domain = %name, "Domain created");
        true
    }

    // --- Drops ---

    pub fn insert_drop(&self, new: NewDrop, now: DateTime<Utc>) -> Drop {
        let mut tables = self.inner.tables.write();
        tables.next_drop += 1;
        let drop = Drop {
            id: DropId(tables.next_drop),
            domain: new.domain,
            drop_time: new.drop_time,
            grace_minutes: new.grace_minutes,
            status: DropStatus::Pending,
            winner: None,
            created_at: now,
        };
        tables.drops.insert(drop.id, drop.clone());
        debug!(drop_id = %drop.id, domain = %drop.domain, drop_time = %drop.drop_time, "Drop scheduled");
        drop
    }

    pub fn get_drop(&self, id: DropId) -> Result<Drop, StoreError> {
        self.inner
            .tables
            .read()
            .drops
            .get(&id)
            .cloned()
            .ok_or(StoreError::DropNotFound { id, context: None })
    }

    /// The drop with the latest `drop_time` for `name`; ties go to the newest record.
    #[must_use]
    pub fn latest_drop_for(&self, name: &DomainName) -> Option<Drop> {
        self.inner
            .tables
            .read()
            .drops
            .values()
            .filter(|drop| &drop.domain == name)
            .max_by_key(|drop| (drop.drop_time, drop.id))
            .cloned()
    }

    /// Latest scheduled instant across every drop, used to pick the next free slot.
    #[must_use]
    pub fn latest_drop_time(&self) -> Option<DateTime<Utc>> {
        self.inner.tables.read().drops.values().map(|drop| drop.drop_time).max()
    }

    /// Pending drops whose time has come, earliest first.
    #[must_use]
    pub fn due_drops(&self, now: DateTime<Utc>) -> Vec<DropId> {
        let tables = self.inner.tables.read();
        let mut due: Vec<_> = tables
            .drops
            .values()
            .filter(|drop| drop.is_pending() && drop.is_due(now))
            .map(|drop| (drop.drop_time, drop.id))
            .collect();
        due.sort_unstable();
        due.into_iter().map(|(_, id)| id).collect()
    }

    #[must_use]
    pub fn recent_drops(&self, query: DropQuery) -> Vec<DropListing> {
        let tables = self.inner.tables.read();
        let mut drops: Vec<&Drop> = tables.drops.values().collect();
        drops.sort_by_key(|drop| match query.sort {
            SortField::DropTime => (drop.drop_time, drop.id),
            SortField::CreatedAt => (drop.created_at, drop.id),
        });
        if query.order == SortOrder::Desc {
            drops.reverse();
        }

        drops
            .into_iter()
            .take(query.limit)
            .map(|drop| DropListing {
                drop: drop.clone(),
                competitors: competitors_in(&tables, drop.id),
            })
            .collect()
    }

    pub fn reschedule_drop(
        &self,
        guard: &DropGuard,
        drop_time: DateTime<Utc>,
    ) -> Result<Drop, StoreError> {
        let mut tables = self.inner.tables.write();
        let drop = tables.pending_drop_mut(guard.drop_id())?;
        drop.drop_time = drop_time;
        Ok(drop.clone())
    }

    /// `pending -> captured`, recording the winner.
    pub fn mark_captured(&self, guard: &DropGuard, winner: &str) -> Result<Drop, StoreError> {
        let mut tables = self.inner.tables.write();
        let drop = tables.pending_drop_mut(guard.drop_id())?;
        drop.status = DropStatus::Captured;
        drop.winner = Some(winner.to_owned());
        Ok(drop.clone())
    }

    /// `pending -> missed`.
    pub fn mark_missed(&self, guard: &DropGuard) -> Result<Drop, StoreError> {
        let mut tables = self.inner.tables.write();
        let drop = tables.pending_drop_mut(guard.drop_id())?;
        drop.status = DropStatus::Missed;
        Ok(drop.clone())
    }

    /// Deletes every missed drop together with its competitors.
    pub fn purge_missed(&self) -> usize {
        let mut tables = self.inner.tables.write();
        let removed: Vec<DropId> = tables
            .drops
            .values()
            .filter(|drop| drop.status == DropStatus::Missed)
            .map(|drop| drop.id)
            .collect();
        for id in &removed {
            tables.drops.remove(id);
        }
        tables.competitors.retain(|_, competitor| !removed.contains(&competitor.drop_id));
        removed.len()
    }

    // --- Competitors ---

    /// Competitors of a drop in registration order.
    #[must_use]
    pub fn competitors_of(&self, id: DropId) -> Vec<Competitor> {
        competitors_in(&self.inner.tables.read(), id)
    }

    pub fn competitor(&self, id: CompetitorId) -> Result<Competitor, StoreError> {
        self.inner
            .tables
            .read()
            .competitors
            .get(&id)
            .cloned()
            .ok_or(StoreError::CompetitorNotFound { id, context: None })
    }

    /// Appends a competitor; the drop must still be pending.
    pub fn insert_competitor(
        &self,
        guard: &DropGuard,
        new: NewCompetitor,
        now: DateTime<Utc>,
    ) -> Result<Competitor, StoreError> {
        let mut tables = self.inner.tables.write();
        let drop_id = tables.pending_drop_mut(guard.drop_id())?.id;
        tables.next_competitor += 1;
        let competitor = Competitor {
            id: CompetitorId(tables.next_competitor),
            drop_id,
            name: new.name,
            attempts: new.attempts,
            delay_ms: new.delay_ms,
            created_at: now,
        };
        tables.competitors.insert(competitor.id, competitor.clone());
        Ok(competitor)
    }

    /// Changes the simulated latency of a competitor of the guarded, still pending drop.
    pub fn set_competitor_delay(
        &self,
        guard: &DropGuard,
        id: CompetitorId,
        delay_ms: u64,
    ) -> Result<Competitor, StoreError> {
        let mut tables = self.inner.tables.write();
        tables.pending_drop_mut(guard.drop_id())?;
        let competitor = tables
            .competitors
            .get_mut(&id)
            .filter(|competitor| competitor.drop_id == guard.drop_id())
            .ok_or(StoreError::CompetitorNotFound { id, context: None })?;
        competitor.delay_ms = delay_ms;
        Ok(competitor.clone())
    }
}

fn competitors_in(tables: &Tables, id: DropId) -> Vec<Competitor> {
    tables.competitors.values().filter(|competitor| competitor.drop_id == id).cloned().collect()
}
