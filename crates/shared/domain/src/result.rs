use serde::Serialize;

/// Result codes carried in every protocol and registration response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum ResultCode {
    Success,
    BadMethod,
    InvalidInput,
    Unauthorized,
    ObjectExists,
    DropNotFound,
    InvalidState,
    CommandFailed,
}

impl ResultCode {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Success => 1000,
            Self::BadMethod => 2001,
            Self::InvalidInput => 2002,
            Self::Unauthorized => 2200,
            Self::ObjectExists => 2302,
            Self::DropNotFound => 2303,
            Self::InvalidState => 2304,
            Self::CommandFailed => 2400,
        }
    }

    /// Default human-readable message for the code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "Command completed successfully",
            Self::BadMethod => "Invalid request method",
            Self::InvalidInput => "Invalid input",
            Self::Unauthorized => "Unauthorized",
            Self::ObjectExists => "Object exists",
            Self::DropNotFound => "Drop not found",
            Self::InvalidState => "Drop is not pending",
            Self::CommandFailed => "Command failed",
        }
    }

    /// HTTP status used when the code travels over the HTTP API.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::BadMethod => 405,
            Self::InvalidInput | Self::ObjectExists | Self::InvalidState => 400,
            Self::Unauthorized => 401,
            Self::DropNotFound => 404,
            Self::CommandFailed => 500,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ResultCode> for u16 {
    fn from(code: ResultCode) -> Self {
        code.code()
    }
}
