//! # Domain Models
//!
//! Pure types shared by every slice: identifiers, drops, competitors, wire result
//! codes and the typed application configuration.
//! Keep it lean: no I/O, networking, or locking here.

pub mod config;
pub mod drops;
pub mod identity;
pub mod result;

pub use drops::{Competitor, CompetitorId, Domain, Drop, DropId, DropStatus};
pub use identity::{DomainName, IdentityError};
pub use result::ResultCode;
