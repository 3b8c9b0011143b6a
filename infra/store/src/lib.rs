//! An in-memory store for domains, drops and competitors.
//!
//! The store plays the role of the transactional collaborator every slice talks to:
//! table reads and writes are short synchronous critical sections, while drop-level
//! serialization is expressed explicitly through [`Store::lock_drop`].
//!
//! # Core Guarantees
//!
//! - **Identity uniqueness**: [`Store::create_domain_if_absent`] is atomic; at most one
//!   caller ever observes `true` for a given identity.
//! - **Per-drop exclusion**: every mutation of a drop or its competitors requires a
//!   [`DropGuard`], obtained by awaiting the drop's async mutex. Different drops never
//!   contend.
//! - **Monotonic status**: drops only leave `pending`; a terminal drop rejects further
//!   transitions with [`StoreError::InvalidState`].
//!
//! # Examples
//!
//! ```rust
//! use chrono::Utc;
//! use dropcatch_domain::DomainName;
//! use dropcatch_store::{NewCompetitor, NewDrop, Store, StoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     let store = Store::new();
//!     let now = Utc::now();
//!     let name = DomainName::parse("alpha.com").unwrap();
//!     let drop = store.insert_drop(NewDrop::new(name, now, 5), now);
//!
//!     let guard = store.lock_drop(drop.id).await;
//!     store.insert_competitor(&guard, NewCompetitor::new("bot", 1, 120), now)?;
//!     store.mark_captured(&guard, "bot")?;
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod locks;
mod query;

pub use engine::{NewCompetitor, NewDrop, Store};
pub use error::{StoreError, StoreErrorExt};
pub use locks::DropGuard;
pub use query::{DropListing, DropQuery, SortField, SortOrder};
