//! # Race
//!
//! Decides who wins a drop. [`RaceResolver`] runs one race under the drop lock;
//! [`Sweeper`] finds every elapsed pending drop and resolves it without a live claimant,
//! marking it missed once its grace window is over.

mod error;
pub mod resolver;
pub mod sweep;

pub use error::{RaceError, RaceErrorExt};
pub use resolver::{
    AttemptResult, ClaimAttempt, Contender, ContenderKind, LiveClaimant, RaceOutcome, RaceResolver,
};
pub use sweep::{CapturedDrop, SweepFailure, SweepReport, Sweeper};
