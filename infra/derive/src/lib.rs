#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `DropCatch` workspace.
//!
//! * [`macro@main`] bootstraps a binary on a profiled Tokio runtime.
//! * [`macro@dropcatch_error`] turns a plain enum into a contextual error type.
//!
//! Consumers depend on the crate through the workspace:
//! ```toml
//! [dependencies]
//! dropcatch-derive.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap a profiled Tokio runtime.
///
/// Turns an `async fn main` returning a `Result` into a synchronous `fn main`
/// that builds a runtime through `dropcatch_runtime::build_runtime_with_config`
/// and blocks on the original body.
///
/// # Arguments
///
/// * `high_performance` - Server preset (large stacks, long keep-alive).
/// * `memory_efficient` - Half the worker threads, smaller stacks.
/// * `default` - Auto-detected worker threads.
///
/// # Examples
///
/// ```rust,ignore
/// #[dropcatch_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for every variant with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * A variant carrying a source must also carry
///   `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[dropcatch_derive::dropcatch_error]
/// pub enum StoreError {
///     #[error("Drop not found{}: {message}", format_context(.context))]
///     DropNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn dropcatch_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
