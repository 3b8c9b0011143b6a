use crate::error::ApiError;
use chrono::{DateTime, Duration, Utc};
use dropcatch_domain::config::DropsConfig;
use dropcatch_domain::{Competitor, CompetitorId, DomainName, Drop, DropId};
use dropcatch_kernel::SharedClock;
use dropcatch_store::{NewDrop, Store};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::ops::RangeInclusive;
use tracing::info;

pub const RANDOM_SUFFIXES: [&str; 8] = ["com", "net", "org", "uk", "eu", "info", "io", "co"];
pub const BATCH_SIZE: RangeInclusive<u32> = 1..=100;
pub const GRACE_MINUTES: RangeInclusive<u32> = 1..=60;
const RANDOM_NUMBER: RangeInclusive<u32> = 10_000..=99_999;

/// Operator actions on the drop schedule.
#[derive(Debug, Clone)]
pub struct DropAdmin {
    store: Store,
    clock: SharedClock,
    settings: DropsConfig,
}

impl DropAdmin {
    #[must_use]
    pub const fn new(store: Store, clock: SharedClock, settings: DropsConfig) -> Self {
        Self { store, clock, settings }
    }

    /// Schedules a drop, by default one slot after the latest scheduled drop.
    pub fn schedule(
        &self,
        domain: DomainName,
        drop_time: Option<DateTime<Utc>>,
        grace_minutes: Option<u32>,
    ) -> Result<Drop, ApiError> {
        let grace = grace_minutes.unwrap_or(self.settings.grace_minutes);
        check_grace(grace)?;

        let now = self.clock.now();
        let drop_time = match drop_time {
            Some(drop_time) => drop_time,
            None => self.slot_time(self.slot_base(now), 1)?,
        };
        let drop = self.store.insert_drop(NewDrop::new(domain, drop_time, grace), now);
        info!(drop_id = %drop.id, domain = %drop.domain, drop_time = %drop.drop_time, "Drop scheduled");
        Ok(drop)
    }

    /// Generates `count` drops for random identities in consecutive slots.
    pub fn generate(&self, count: u32, grace_minutes: u32) -> Result<Vec<Drop>, ApiError> {
        if !BATCH_SIZE.contains(&count) {
            return Err(ApiError::invalid(format!("count must be within 1..=100, got {count}")));
        }
        check_grace(grace_minutes)?;

        let now = self.clock.now();
        let base = self.slot_base(now);
        let mut rng = rand::rng();
        let mut drops = Vec::with_capacity(count as usize);

        for slot in 1..=count {
            let name = format!("domain{}", rng.random_range(RANDOM_NUMBER));
            let suffix = RANDOM_SUFFIXES.choose(&mut rng).copied().unwrap_or("com");
            let domain = DomainName::from_parts(&name, suffix)
                .map_err(|e| ApiError::Internal { message: e.to_string().into(), context: None })?;
            let drop_time = self.slot_time(base, slot)?;
            drops.push(self.store.insert_drop(NewDrop::new(domain, drop_time, grace_minutes), now));
        }

        info!(count, "Random drops generated");
        Ok(drops)
    }

    pub async fn reschedule(&self, id: DropId, drop_time: DateTime<Utc>) -> Result<Drop, ApiError> {
        let guard = self.store.lock_drop(id).await;
        Ok(self.store.reschedule_drop(&guard, drop_time)?)
    }

    pub async fn set_delay(&self, id: CompetitorId, delay_ms: i64) -> Result<Competitor, ApiError> {
        let delay_ms = u64::try_from(delay_ms)
            .map_err(|_| ApiError::invalid(format!("delay_ms must be >= 0, got {delay_ms}")))?;
        let drop_id = self.store.competitor(id)?.drop_id;

        let guard = self.store.lock_drop(drop_id).await;
        Ok(self.store.set_competitor_delay(&guard, id, delay_ms)?)
    }

    pub fn purge_missed(&self) -> usize {
        let removed = self.store.purge_missed();
        info!(removed, "Missed drops purged");
        removed
    }

    fn slot_base(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.store.latest_drop_time().unwrap_or(now)
    }

    /// `base` plus `index` slots, or `InvalidInput` past the representable range.
    fn slot_time(&self, base: DateTime<Utc>, index: u32) -> Result<DateTime<Utc>, ApiError> {
        i64::from(self.settings.slot_spacing_minutes)
            .checked_mul(i64::from(index))
            .and_then(Duration::try_minutes)
            .and_then(|offset| base.checked_add_signed(offset))
            .ok_or_else(|| ApiError::invalid(format!("slot {index} after {base} is out of range")))
    }
}

fn check_grace(grace: u32) -> Result<(), ApiError> {
    if GRACE_MINUTES.contains(&grace) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("grace_minutes must be within 1..=60, got {grace}")))
    }
}
