use dropcatch_derive::dropcatch_error;
use std::borrow::Cow;

#[dropcatch_error]
pub enum DemoError {
    #[error("Drop not found{}: {message}", format_context(.context))]
    DropNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk gone")).context("reading drops")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading drops): disk gone");

    let internal: DemoError = "boom".into();
    assert!(matches!(internal, DemoError::Internal { .. }));

    let missing: Result<(), DemoError> =
        Err(DemoError::DropNotFound { message: "42".into(), context: None });
    let err = missing.context("sweep").unwrap_err();
    assert_eq!(err.to_string(), "Drop not found (sweep): 42");
}
