use crate::error::RegistrationError;
use dropcatch_domain::{CompetitorId, DropId};
use dropcatch_kernel::SharedClock;
use dropcatch_store::{NewCompetitor, Store, StoreError};
use tracing::{info, instrument};

const TOKEN_SCHEME: &str = "Token ";

/// Checks an `Authorization: Token <token>` header against the configured token.
///
/// Without a configured token every request is rejected.
pub fn authorize(expected: Option<&str>, header: Option<&str>) -> Result<(), RegistrationError> {
    let presented = header.map(|h| h.strip_prefix(TOKEN_SCHEME).unwrap_or(h).trim());
    match (expected, presented) {
        (Some(expected), Some(presented)) if !expected.is_empty() && expected == presented => Ok(()),
        (None, _) => Err(RegistrationError::Unauthorized {
            context: Some("no API token configured".into()),
        }),
        _ => Err(RegistrationError::Unauthorized { context: None }),
    }
}

#[derive(Debug, Clone)]
pub struct Registrar {
    store: Store,
    clock: SharedClock,
}

impl Registrar {
    #[must_use]
    pub const fn new(store: Store, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Appends a competitor to a pending drop.
    ///
    /// Existence and status are checked under the drop lock, so a registration can never
    /// slip in after a race has started. Calls are not idempotent.
    #[instrument(skip(self), err)]
    pub async fn register(
        &self,
        drop_id: DropId,
        name: &str,
        attempts: u32,
        delay_ms: i64,
    ) -> Result<CompetitorId, RegistrationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationError::invalid("competitor name is empty"));
        }
        let delay_ms = u64::try_from(delay_ms)
            .map_err(|_| RegistrationError::invalid(format!("delay_ms must be >= 0, got {delay_ms}")))?;

        let guard = self.store.lock_drop(drop_id).await;
        let drop = self.store.get_drop(drop_id)?;
        if !drop.is_pending() {
            return Err(RegistrationError::InvalidState { id: drop_id, context: None });
        }

        let competitor = self
            .store
            .insert_competitor(&guard, NewCompetitor::new(name, attempts, delay_ms), self.clock.now())
            .map_err(|e| match e {
                StoreError::InvalidState { .. } => {
                    RegistrationError::InvalidState { id: drop_id, context: None }
                },
                other => other.into(),
            })?;

        info!(drop_id = %drop_id, competitor_id = %competitor.id, delay_ms, "Competitor registered");
        Ok(competitor.id)
    }
}
