//! Kernel utilities shared across slices.
//! Keep this crate lightweight: layered config loading, the injectable [`Clock`], and the
//! XML envelopes every protocol surface answers with.
//!
//! ## Config loading
//! ```rust,ignore
//! use dropcatch_kernel::config::load_config;
//! let cfg: dropcatch_kernel::domain::config::AppConfig = load_config(Some("server")).unwrap();
//! ```
pub mod clock;
pub mod config;
pub mod xml;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use dropcatch_domain as domain;
