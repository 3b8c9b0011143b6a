use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dropcatch_domain::ResultCode;
use dropcatch_registration::RegistrationError;
use dropcatch_store::StoreError;
use serde_json::json;
use std::borrow::Cow;

/// Failures of the JSON admin endpoints.
#[dropcatch_derive::dropcatch_error]
pub enum ApiError {
    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid state{}: {message}", format_context(.context))]
    InvalidState { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid input{}: {message}", format_context(.context))]
    InvalidInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidInput { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn result_code(&self) -> ResultCode {
        match self {
            Self::Unauthorized { .. } => ResultCode::Unauthorized,
            Self::NotFound { .. } => ResultCode::DropNotFound,
            Self::InvalidState { .. } => ResultCode::InvalidState,
            Self::InvalidInput { .. } => ResultCode::InvalidInput,
            Self::Internal { .. } => ResultCode::CommandFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.result_code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "code": code, "message": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string().into();
        match err {
            StoreError::DropNotFound { .. } | StoreError::CompetitorNotFound { .. } => {
                Self::NotFound { message, context: None }
            },
            StoreError::InvalidState { .. } => Self::InvalidState { message, context: None },
            StoreError::Internal { .. } => Self::Internal { message, context: None },
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        let message = err.to_string().into();
        match err {
            RegistrationError::NotFound { .. } => Self::NotFound { message, context: None },
            RegistrationError::InvalidState { .. } => Self::InvalidState { message, context: None },
            RegistrationError::InvalidInput { .. } => Self::InvalidInput { message, context: None },
            RegistrationError::Unauthorized { context } => Self::Unauthorized { context },
            RegistrationError::Internal { .. } => Self::Internal { message, context: None },
        }
    }
}
