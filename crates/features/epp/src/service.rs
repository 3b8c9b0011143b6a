use crate::command::Command;
use crate::error::EppError;
use crate::response;
use chrono::{DateTime, Duration, Utc};
use dropcatch_domain::DomainName;
use dropcatch_kernel::SharedClock;
use dropcatch_race::{LiveClaimant, RaceResolver};
use dropcatch_store::{NewDrop, Store};
use tracing::{debug, info, warn};

/// Knobs of the create path.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Winner name recorded when the connected client wins.
    pub claimant_name: String,
    /// Distance of the drop reseeded after a successful create.
    pub reseed_after: Duration,
    pub grace_minutes: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self { claimant_name: "You".to_owned(), reseed_after: Duration::days(1), grace_minutes: 5 }
    }
}

/// Command semantics, independent of the transport.
#[derive(Debug, Clone)]
pub struct EppService {
    store: Store,
    resolver: RaceResolver,
    clock: SharedClock,
    settings: ServiceSettings,
}

impl EppService {
    #[must_use]
    pub const fn new(
        store: Store,
        resolver: RaceResolver,
        clock: SharedClock,
        settings: ServiceSettings,
    ) -> Self {
        Self { store, resolver, clock, settings }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Parses and executes one frame, returning the reply document.
    ///
    /// # Errors
    /// Malformed frames and internal faults; the caller closes the connection on error.
    pub async fn handle(&self, payload: &[u8]) -> Result<String, EppError> {
        match Command::parse(payload)? {
            Command::Check(name) => Ok(self.check(&name)),
            Command::Create(name) => self.create(&name).await,
            Command::Other => {
                warn!("Unrecognised command, answering with generic success");
                Ok(response::generic_success())
            },
        }
    }

    #[must_use]
    pub fn check(&self, name: &DomainName) -> String {
        let available = !self.store.domain_exists(name);
        debug!(domain = %name, available, "Check");
        response::check(name, available)
    }

    pub async fn create(&self, name: &DomainName) -> Result<String, EppError> {
        let now = self.clock.now();

        let Some(candidate) = self.store.latest_drop_for(name).filter(|drop| drop.is_due(now)) else {
            return Ok(self.create_immediately(name, now));
        };

        // Re-read under the lock: the drop may have been resolved, rescheduled or purged.
        let guard = self.store.lock_drop(candidate.id).await;
        let raceable = self
            .store
            .get_drop(candidate.id)
            .is_ok_and(|drop| drop.is_pending() && drop.is_due(now));
        if !raceable {
            debug!(domain = %name, drop_id = %candidate.id, "No pending due drop, creating directly");
            return Ok(self.create_immediately(name, now));
        }

        let live = LiveClaimant::new(self.settings.claimant_name.clone());
        let outcome = self.resolver.resolve_locked(&guard, Some(live), now).await?;
        drop(guard);

        if outcome.live_won() {
            self.reseed(name, now);
            Ok(response::create_success(name, now))
        } else {
            let winner = outcome.winner.map(|w| w.name);
            info!(domain = %name, winner = ?winner, "Live claimant lost the race");
            Ok(response::create_failure())
        }
    }

    /// Atomic create-if-absent for identities without a raceable drop.
    fn create_immediately(&self, name: &DomainName, now: DateTime<Utc>) -> String {
        if self.store.create_domain_if_absent(name, now) {
            info!(domain = %name, "Domain created outside a drop");
            self.reseed(name, now);
            response::create_success(name, now)
        } else {
            response::create_failure()
        }
    }

    fn reseed(&self, name: &DomainName, now: DateTime<Utc>) {
        let drop_time = now + self.settings.reseed_after;
        let drop =
            self.store.insert_drop(NewDrop::new(name.clone(), drop_time, self.settings.grace_minutes), now);
        debug!(domain = %name, drop_id = %drop.id, drop_time = %drop.drop_time, "Drop reseeded");
    }
}
