use dropcatch_domain::{DropId, ResultCode};
use dropcatch_kernel::xml;
use dropcatch_store::StoreError;
use std::borrow::Cow;

#[dropcatch_derive::dropcatch_error]
pub enum RegistrationError {
    #[error("Drop not found{}: {id}", format_context(.context))]
    NotFound { id: DropId, context: Option<Cow<'static, str>> },

    #[error("Drop is not pending{}: {id}", format_context(.context))]
    InvalidState { id: DropId, context: Option<Cow<'static, str>> },

    #[error("Invalid input{}: {message}", format_context(.context))]
    InvalidInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },

    #[error("Registration failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistrationError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidInput { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn result_code(&self) -> ResultCode {
        match self {
            Self::NotFound { .. } => ResultCode::DropNotFound,
            Self::InvalidState { .. } => ResultCode::InvalidState,
            Self::InvalidInput { .. } => ResultCode::InvalidInput,
            Self::Unauthorized { .. } => ResultCode::Unauthorized,
            Self::Internal { .. } => ResultCode::CommandFailed,
        }
    }

    /// The XML answer for this failure.
    #[must_use]
    pub fn to_response(&self) -> String {
        xml::response(self.result_code(), &self.to_string(), None)
    }
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DropNotFound { id, context } => Self::NotFound { id, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
