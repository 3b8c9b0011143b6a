use dropcatch_race::RaceError;
use std::borrow::Cow;

#[dropcatch_derive::dropcatch_error]
pub enum EppError {
    /// Input that is not a command document this server can act on.
    #[error("Protocol error{}: {message}", format_context(.context))]
    Protocol { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Frame of {length} bytes exceeds the {max} byte limit{}", format_context(.context))]
    FrameTooLarge { length: usize, max: usize, context: Option<Cow<'static, str>> },

    #[error("Malformed XML{}: {source}", format_context(.context))]
    Xml { source: roxmltree::Error, context: Option<Cow<'static, str>> },

    #[error("Connection I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Race failed{}: {source}", format_context(.context))]
    Race { source: RaceError, context: Option<Cow<'static, str>> },

    #[error("Internal protocol error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl EppError {
    pub(crate) fn protocol(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Protocol { message: message.into(), context: None }
    }
}
