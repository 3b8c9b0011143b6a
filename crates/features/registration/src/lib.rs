//! # Registration
//!
//! Appends competitors to drops that are still pending. The HTTP surface hands in the
//! raw capture document and the `Authorization` header; everything from token checking
//! to the XML answer lives here so the transport stays thin.
//!
//! ```rust
//! use dropcatch_registration::CaptureRequest;
//!
//! let req = CaptureRequest::parse(
//!     r#"<epp xmlns:drop="urn:dropcatch:params:xml:ns:drop-1.0"><command><capture>
//!          <drop:id>7</drop:id><drop:name>sniper</drop:name>
//!        </capture></command></epp>"#,
//! )
//! .unwrap();
//! assert_eq!(req.attempts, 1);
//! assert_eq!(req.delay_ms, 100);
//! ```

mod capture;
mod error;
mod registrar;

pub use capture::{CaptureRequest, DEFAULT_ATTEMPTS, DEFAULT_DELAY_MS, success_response};
pub use error::{RegistrationError, RegistrationErrorExt};
pub use registrar::{Registrar, authorize};
