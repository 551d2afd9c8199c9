//! Error handling for wmpc.
//!
//! Provides a unified error type combining a category ([`ErrorKind`], based
//! on gRPC status codes) with the underlying error details. The failure
//! policy of this crate is silent degradation: errors are logged as
//! diagnostics and recovered locally, never surfaced as fatal conditions,
//! so most of these categories only ever reach a log line.

use std::fmt;

use thiserror::Error as ThisError;

/// Main error type combining error kind and details.
#[derive(Debug)]
pub struct Error {
    /// Classification of the error
    pub kind: ErrorKind,

    /// Details of the underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

/// Standard result type for wmpc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories based on gRPC status codes.
#[expect(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, ThisError, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u32)]
pub enum ErrorKind {
    /// The operation was cancelled before completion.
    #[error("operation was cancelled")]
    Cancelled = 1,

    /// Failure that fits no other category.
    #[error("unknown error")]
    Unknown = 2,

    /// Malformed input, for example an undecodable frame or gesture.
    #[error("invalid argument specified")]
    InvalidArgument = 3,

    /// A referenced entity no longer exists, for example a track id that
    /// left the playlist between gesture capture and command construction.
    #[error("not found")]
    NotFound = 5,

    /// The operation was attempted in a state that does not permit it.
    #[error("invalid state")]
    FailedPrecondition = 9,

    /// Well-formed input this client does not recognize, for example a
    /// server update kind added after this release.
    #[error("not implemented")]
    Unimplemented = 12,

    /// Invariant violation inside this crate.
    #[error("internal error")]
    Internal = 13,

    /// The connection or a local resource is unavailable.
    #[error("service unavailable")]
    Unavailable = 14,
}

impl Error {
    /// Creates a new error with specified kind and details.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Creates an error for malformed input.
    pub fn invalid_argument<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidArgument, error)
    }

    /// Creates an error for entities that no longer exist.
    pub fn not_found<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::NotFound, error)
    }

    /// Creates an error for operations attempted in an invalid state.
    pub fn failed_precondition<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::FailedPrecondition, error)
    }

    /// Creates an error for recognized but unsupported input.
    pub fn unimplemented<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unimplemented, error)
    }

    /// Creates an error for internal invariant violations.
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Internal, error)
    }

    /// Creates an error for unavailable connections or resources.
    pub fn unavailable<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unavailable, error)
    }

    /// Attempts to downcast the underlying error to a concrete type.
    #[must_use]
    pub fn downcast<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.error.downcast_ref::<E>()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_argument(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(error),
            _ => Self::unavailable(error),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::unavailable(error)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Self::invalid_argument(error)
    }
}
