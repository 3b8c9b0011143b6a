//! # EPP
//!
//! A minimal, EPP-flavoured TCP protocol through which a real client can take part in
//! a drop race.
//!
//! Every frame is a big-endian `u32` length that counts its own four bytes, followed by
//! a UTF-8 XML document. On connect the server sends a greeting, then answers one frame
//! per command:
//!
//! * `check` reports whether the identity is still available.
//! * `create` either claims an identity with no due drop immediately, or joins the
//!   drop's race as a zero-latency contender.
//! * Anything else gets a generic success.
//!
//! Malformed input closes only the offending connection.

mod codec;
mod command;
mod error;
pub mod response;
mod server;
mod service;

pub use codec::{EppCodec, HEADER_LEN};
pub use command::Command;
pub use error::{EppError, EppErrorExt};
pub use server::{EppServer, SessionSettings};
pub use service::{EppService, ServiceSettings};
