use dropcatch_domain::DropId;
use dropcatch_store::StoreError;
use std::borrow::Cow;

#[dropcatch_derive::dropcatch_error]
pub enum RaceError {
    /// Resolution was requested for a drop that already left `pending`.
    #[error("Drop {id} is not pending{}: {status}", format_context(.context))]
    InvalidState { id: DropId, status: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store failure{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },
}
