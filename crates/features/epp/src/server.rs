use crate::codec::EppCodec;
use crate::error::{EppError, EppErrorExt};
use crate::response;
use crate::service::EppService;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Per-connection knobs.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub server_id: String,
    pub read_timeout: Duration,
    pub max_frame_bytes: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            server_id: "Mock Nominet EPP".to_owned(),
            read_timeout: Duration::from_secs(300),
            max_frame_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug)]
struct SessionContext {
    service: EppService,
    settings: SessionSettings,
}

/// A bound listener, one task per accepted connection.
#[derive(Debug)]
pub struct EppServer {
    listener: TcpListener,
    context: Arc<SessionContext>,
}

impl EppServer {
    /// Binds the listening socket.
    ///
    /// # Errors
    /// Returns [`EppError::Io`] when the address cannot be bound.
    pub async fn bind(
        address: SocketAddr,
        service: EppService,
        settings: SessionSettings,
    ) -> Result<Self, EppError> {
        let listener =
            TcpListener::bind(address).await.context(format!("Failed to bind {address}"))?;
        Ok(Self { listener, context: Arc::new(SessionContext { service, settings }) })
    }

    /// # Errors
    /// Fails only if the OS cannot report the bound address.
    pub fn local_addr(&self) -> Result<SocketAddr, EppError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` is cancelled. Open sessions observe the same
    /// token and close after their current command.
    pub async fn run(self, shutdown: CancellationToken) {
        match self.listener.local_addr() {
            Ok(addr) => info!(address = %addr, "EPP listener started"),
            Err(e) => warn!(error = %e, "EPP listener started on unknown address"),
        }

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                res = self.listener.accept() => match res {
                    Ok((stream, peer)) => {
                        let context = Arc::clone(&self.context);
                        tokio::spawn(serve_session(stream, peer, context, shutdown.child_token()));
                    },
                    Err(e) => error!(error = %e, "Failed to accept connection"),
                },
            }
        }

        info!("EPP listener stopped");
    }
}

#[instrument(name = "session", skip_all, fields(peer = %peer))]
async fn serve_session(
    stream: TcpStream,
    peer: SocketAddr,
    context: Arc<SessionContext>,
    shutdown: CancellationToken,
) {
    debug!("Connection accepted");
    let mut framed = Framed::new(stream, EppCodec::new(context.settings.max_frame_bytes));

    let greeting = response::greeting(&context.settings.server_id, context.service.now());
    if let Err(e) = framed.send(greeting).await {
        warn!(error = %e, "Failed to send greeting");
        return;
    }

    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break,
            next = tokio::time::timeout(context.settings.read_timeout, framed.next()) => next,
        };

        let payload = match next {
            Err(_) => {
                info!("Idle timeout, closing connection");
                break;
            },
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                warn!(error = %e, "Protocol error, closing connection");
                break;
            },
            Ok(Some(Ok(payload))) if payload.is_empty() => break,
            Ok(Some(Ok(payload))) => payload,
        };

        let reply = match context.service.handle(&payload).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Command failed, closing connection");
                break;
            },
        };

        if let Err(e) = framed.send(reply).await {
            warn!(error = %e, "Failed to send reply");
            break;
        }
    }

    debug!("Connection closed");
}
