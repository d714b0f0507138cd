use thiserror::Error;

/// Exit status for any failure that does not carry its own code.
pub const GENERIC_FAILURE: i32 = 1;

/// Category of a validation failure detected before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ArgumentCount,
    InvalidHeader,
    InvalidUrl,
}

impl ErrorKind {
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::ArgumentCount => 2,
            ErrorKind::InvalidHeader => 3,
            ErrorKind::InvalidUrl => 4,
        }
    }
}

/// An error that also decides the process exit status.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ReturnCodeError {
    kind: ErrorKind,
    message: String,
    code: i32,
}

impl ReturnCodeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: kind.code(),
        }
    }

    pub fn argument_count(count: usize) -> Self {
        Self::new(
            ErrorKind::ArgumentCount,
            format!("you must provide a single URL to be called but you provided {count}"),
        )
    }

    pub fn invalid_header(raw: &str) -> Self {
        Self::new(
            ErrorKind::InvalidHeader,
            format!("header is not a valid http header separated by `:`, value was: [{raw}]"),
        )
    }

    pub fn invalid_url(raw: &str, cause: url::ParseError) -> Self {
        Self::new(
            ErrorKind::InvalidUrl,
            format!("the URL provided is invalid: {raw}: {cause}"),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

/// Finds the validation error behind `err`, looking through any added context.
pub fn return_code_error(err: &anyhow::Error) -> Option<&ReturnCodeError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ReturnCodeError>())
}

/// Picks the process exit status for an error returned from a run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    return_code_error(err).map_or(GENERIC_FAILURE, ReturnCodeError::code)
}
