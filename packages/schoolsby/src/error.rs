use thiserror::Error;

use crate::interval::Quarter;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[error("{kind:?} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request failed, returned a non-success status or timed out.
    Transport,
    /// The page was fetched but does not have the expected structure.
    MalformedPage,
    /// The portal (or the interval source) knows nothing about the quarter yet.
    UnresolvedQuarter,
    InvalidArgument,
}

impl Error {
    pub fn transport(message: String) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message,
        }
    }

    pub fn malformed_page(message: String) -> Self {
        Self {
            kind: ErrorKind::MalformedPage,
            message,
        }
    }

    pub fn unresolved_quarter(quarter: Quarter) -> Self {
        Self {
            kind: ErrorKind::UnresolvedQuarter,
            message: format!("Quarter {quarter} is not configured"),
        }
    }

    pub fn invalid_argument(message: String) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_unresolved_quarter(&self) -> bool {
        self.kind == ErrorKind::UnresolvedQuarter
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::transport(format!("Request error: {err}"))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::invalid_argument(format!("Invalid URL: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_quarter_is_distinguishable() {
        let quarter = Quarter::new(2).unwrap();
        let err = Error::unresolved_quarter(quarter);
        assert!(err.is_unresolved_quarter());
        assert_eq!(err.kind(), ErrorKind::UnresolvedQuarter);
        assert!(!Error::transport("boom".to_string()).is_unresolved_quarter());
    }

    #[test]
    fn display_contains_kind_and_message() {
        let err = Error::malformed_page("Week container not found".to_string());
        assert_eq!(
            err.to_string(),
            "MalformedPage error: Week container not found"
        );
    }
}
