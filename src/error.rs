//! Error types for the public interface of the crate.
//!
//! Internally, code returns `anyhow` results (`Res<T>`) and adds context as errors bubble up. At the
//! public boundary (commands), errors are tagged with an `ErrorType` via `IntoResult::pub_result`
//! so that callers can tell a rejected input apart from a broken database or a failed collaborator.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an `Error`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The caller supplied malformed or disallowed input. Nothing was written.
    Validation,
    /// The configuration or data directory is missing or invalid.
    Config,
    /// The record store failed.
    Database,
    /// An external collaborator (OCR, advice provider) failed.
    Collaborator,
    /// Reading or writing a file failed.
    Io,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type: an `ErrorType` plus the full `anyhow` context chain.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Creates a validation error with `message`.
    pub fn validation(message: impl Display) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn is_validation(&self) -> bool {
        self.error_type == ErrorType::Validation
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for Error {
    fn from(inner: anyhow::Error) -> Self {
        match inner.downcast::<Error>() {
            Ok(e) => e,
            Err(inner) => Self::new(ErrorType::Internal, inner),
        }
    }
}

/// Converts an internal result into the public `Result`, tagging the error with an `ErrorType`.
/// An error that is already a public `Error` keeps its original type.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| match e.into().downcast::<Error>() {
            Ok(public) => public,
            Err(inner) => Error::new(error_type, inner),
        })
    }
}
