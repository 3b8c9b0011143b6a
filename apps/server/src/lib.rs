//! # Drop-catch server
//!
//! Hosts the live EPP listener, the HTTP API and the periodic sweep over one in-memory
//! store. Every subsystem observes the same cancellation token, so a single signal stops
//! them all.
//!
//! ## Example
//! ```no_run
//! use dropcatch_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .http_port(8080)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

pub mod admin;
pub mod error;
mod handlers;
pub mod router;
pub mod state;

use anyhow::{Context, Result};
use axum_server::Handle;
use dropcatch_domain::config::AppConfig;
use dropcatch_epp::{EppServer, ServiceSettings, SessionSettings};
use dropcatch_kernel::{SharedClock, SystemClock};
use dropcatch_store::Store;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
    clock: Option<SharedClock>,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.cfg.http.port = port;
        self
    }

    pub fn epp_port(mut self, port: u16) -> Self {
        self.cfg.epp.port = port;
        self
    }

    /// Replaces the wall clock, e.g. with a manually driven one.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.http.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!(
                        "SECURITY: SSL Private Key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Validates the configuration and wires the application state.
    ///
    /// # Errors
    /// Returns an error if:
    /// * SSL certificate/key files are missing
    /// * the sweep is enabled with a zero interval
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;
        if self.cfg.sweep.enabled && self.cfg.sweep.interval_secs == 0 {
            anyhow::bail!("sweep.interval_secs must be greater than zero");
        }
        if self.cfg.registration.api_token.is_none() {
            warn!("registration.api_token is not set, capture and admin requests will be rejected");
        }

        info!(
            http = %SocketAddr::new(self.cfg.http.address, self.cfg.http.port),
            epp = %SocketAddr::new(self.cfg.epp.address, self.cfg.epp.port),
            latency = ?self.cfg.race.latency,
            "Initializing server"
        );

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let state = AppState::new(self.cfg, Store::new(), clock);
        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts every subsystem and runs until a shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if a listener cannot bind or TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let shutdown = CancellationToken::new();

        let epp = self.bind_epp().await?;
        let epp_task = tokio::spawn(epp.run(shutdown.clone()));

        let sweep_task: Option<JoinHandle<()>> = cfg.sweep.enabled.then(|| {
            let interval = Duration::from_secs(cfg.sweep.interval_secs);
            tokio::spawn(self.state.sweeper.clone().run(interval, shutdown.clone()))
        });

        let handle = Handle::<SocketAddr>::new();
        let signal_task = {
            let handle = handle.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = shutdown.cancelled() => {},
                    res = shutdown_signal() => {
                        if let Err(e) = res {
                            error!("Error while waiting for shutdown signal: {e}");
                        }
                        info!("Shutdown signal received, starting graceful shutdown...");
                    },
                }
                shutdown.cancel();
                handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            })
        };

        let served = self.serve_http(handle).await;
        shutdown.cancel();

        for (name, task) in [("epp", Some(epp_task)), ("sweep", sweep_task), ("signal", Some(signal_task))] {
            if let Some(task) = task
                && let Err(e) = task.await
            {
                error!(task = name, error = %e, "Background task panicked");
            }
        }

        served?;
        info!("Server shutdown complete");
        Ok(())
    }

    async fn bind_epp(&self) -> Result<EppServer> {
        let cfg = &self.state.config;
        let address = SocketAddr::new(cfg.epp.address, cfg.epp.port);

        let service = dropcatch_epp::EppService::new(
            self.state.store.clone(),
            self.state.resolver.clone(),
            Arc::clone(&self.state.clock),
            ServiceSettings {
                claimant_name: cfg.epp.claimant_name.clone(),
                reseed_after: chrono::Duration::hours(i64::from(cfg.drops.reseed_after_hours)),
                grace_minutes: cfg.drops.grace_minutes,
            },
        );
        let session = SessionSettings {
            server_id: cfg.epp.server_id.clone(),
            read_timeout: Duration::from_secs(cfg.epp.read_timeout_secs),
            max_frame_bytes: cfg.epp.max_frame_bytes,
        };

        EppServer::bind(address, service, session)
            .await
            .with_context(|| format!("Failed to start EPP listener on {address}"))
    }

    async fn serve_http(&self, handle: Handle<SocketAddr>) -> Result<()> {
        let cfg = &self.state.config;
        let address = SocketAddr::new(cfg.http.address, cfg.http.port);
        let app = router::init(self.state.clone());

        if let Some(ssl_config) = &cfg.http.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
