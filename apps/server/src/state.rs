use crate::admin::DropAdmin;
use axum::extract::FromRef;
use dropcatch_domain::config::AppConfig;
use dropcatch_kernel::SharedClock;
use dropcatch_race::{RaceResolver, Sweeper};
use dropcatch_registration::Registrar;
use dropcatch_store::Store;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    pub store: Store,
    pub clock: SharedClock,
    pub resolver: RaceResolver,
    pub sweeper: Sweeper,
    pub registrar: Registrar,
    pub admin: DropAdmin,
    pub started_at: Instant,
}

/// Shared handle passed to every handler and background task.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    /// Wires the slices around one store and one clock.
    #[must_use]
    pub fn new(config: AppConfig, store: Store, clock: SharedClock) -> Self {
        let resolver = RaceResolver::new(store.clone(), config.race.latency);
        let sweeper = Sweeper::new(store.clone(), resolver.clone(), Arc::clone(&clock));
        let registrar = Registrar::new(store.clone(), Arc::clone(&clock));
        let admin = DropAdmin::new(store.clone(), Arc::clone(&clock), config.drops.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                clock,
                resolver,
                sweeper,
                registrar,
                admin,
                started_at: Instant::now(),
            }),
        }
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.inner.store.clone()
    }
}
