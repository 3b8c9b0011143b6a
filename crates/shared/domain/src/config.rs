use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the server subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub epp: EppConfig,
    pub http: HttpConfig,
    pub sweep: SweepConfig,
    pub race: RaceConfig,
    pub registration: RegistrationConfig,
    pub drops: DropsConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Live protocol listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EppConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Sent as `svID` in the greeting.
    pub server_id: String,
    /// Name recorded as winner when the connected client wins a race.
    pub claimant_name: String,
    /// Idle time after which a silent connection is dropped.
    pub read_timeout_secs: u64,
    pub max_frame_bytes: usize,
}

/// HTTP API server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub latency: LatencyMode,
}

/// How competitor latency is simulated during a race.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyMode {
    /// Attempts are stamped on a virtual timeline; nothing sleeps.
    #[default]
    Virtual,
    /// The resolver sleeps the incremental delay before every attempt.
    RealTime,
}

/// Ingestion and admin authentication. Without a token every request is rejected.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DropsConfig {
    pub grace_minutes: u32,
    pub slot_spacing_minutes: u32,
    /// Offset of the drop reseeded after a successful live create.
    pub reseed_after_hours: u32,
}

// --- Default ---

impl Default for EppConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 700,
            server_id: "Mock Nominet EPP".to_owned(),
            claimant_name: "You".to_owned(),
            read_timeout_secs: 300,
            max_frame_bytes: 64 * 1024,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 8080, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { enabled: true, interval_secs: 60 }
    }
}

impl Default for DropsConfig {
    fn default() -> Self {
        Self { grace_minutes: 5, slot_spacing_minutes: 2, reseed_after_hours: 24 }
    }
}
