use dropcatch_domain::{CompetitorId, DropId};
use std::borrow::Cow;

#[dropcatch_derive::dropcatch_error]
pub enum StoreError {
    #[error("Drop not found{}: {id}", format_context(.context))]
    DropNotFound { id: DropId, context: Option<Cow<'static, str>> },

    #[error("Competitor not found{}: {id}", format_context(.context))]
    CompetitorNotFound { id: CompetitorId, context: Option<Cow<'static, str>> },

    /// The drop is no longer in the state the operation requires.
    #[error("Invalid drop state{}: {message}", format_context(.context))]
    InvalidState { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
