//! Failure records for I/O objects.
//!
//! A [`Status`] is an immutable (kind, message) pair describing why an
//! object stopped working. Healthy objects are represented by the
//! [`Status::ok`] sentinel, which allocates nothing; only actual failures
//! carry a message.

use thiserror::Error;

/// Category of a failure, modeled as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusKind {
    /// Not a failure.
    #[default]
    Ok,
    /// Caller supplied an argument outside the accepted domain.
    InvalidArgument,
    /// Operation invoked in a state that does not permit it.
    FailedPrecondition,
    /// A configured limit (e.g. a size limit) would be exceeded.
    ResourceExhausted,
    /// Data was lost or produced in an unusable form.
    DataLoss,
    /// Internal error in this crate or an underlying codec.
    Internal,
    /// Operation not supported by this writer.
    Unimplemented,
    /// Failure that fits no other kind.
    Unknown,
}

impl StatusKind {
    /// Get the kind name as a string.
    pub fn name(self) -> &'static str {
        match self {
            StatusKind::Ok => "ok",
            StatusKind::InvalidArgument => "invalid argument",
            StatusKind::FailedPrecondition => "failed precondition",
            StatusKind::ResourceExhausted => "resource exhausted",
            StatusKind::DataLoss => "data loss",
            StatusKind::Internal => "internal",
            StatusKind::Unimplemented => "unimplemented",
            StatusKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable failure record.
///
/// Adopted verbatim when one layer fails because of another, so the
/// original cause is visible at the outermost layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Status {
    kind: StatusKind,
    message: String,
}

impl Status {
    /// The non-failure sentinel. Does not allocate.
    pub fn ok() -> Self {
        Status {
            kind: StatusKind::Ok,
            message: String::new(),
        }
    }

    /// Create a failure of the given kind.
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Status {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid-argument failure.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Status::new(StatusKind::InvalidArgument, message)
    }

    /// Create a failed-precondition failure.
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Status::new(StatusKind::FailedPrecondition, message)
    }

    /// Create a resource-exhausted failure.
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Status::new(StatusKind::ResourceExhausted, message)
    }

    /// Create a data-loss failure.
    pub fn data_loss(message: impl Into<String>) -> Self {
        Status::new(StatusKind::DataLoss, message)
    }

    /// Create an internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Status::new(StatusKind::Internal, message)
    }

    /// Create an unimplemented failure.
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Status::new(StatusKind::Unimplemented, message)
    }

    /// Check whether this is the ok sentinel.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.kind == StatusKind::Ok
    }

    /// Get the failure kind.
    #[inline]
    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    /// Get the failure message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}
