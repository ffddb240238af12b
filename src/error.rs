//! Unified error handling for seqnet
//!
//! A single error type covers every failure the executor can surface. Each
//! variant maps onto one of two severities:
//! - Recoverable: an operator failing during a plain `run()`; the caller
//!   decides what happens next.
//! - Fatal: construction-time instantiation failures and anything that goes
//!   wrong inside a benchmark. Fatal conditions never reach the caller as an
//!   ordinary error value (construction refuses to build the executor,
//!   benchmark panics).

use std::fmt;

/// Unified error type for seqnet
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    // ========== Construction Errors ==========
    /// No factory function registered for the operator type
    #[error("unknown operator type: {0}")]
    UnknownOperatorType(String),

    /// Operator arguments missing or of the wrong kind
    #[error("invalid argument for operator '{op}': {reason}")]
    InvalidArgument { op: String, reason: String },

    // ========== Execution Errors ==========
    /// An operator's run failed
    #[error("operator '{name}' ({op_type}) failed: {reason}")]
    OperatorFailed {
        name: String,
        op_type: String,
        reason: String,
    },

    /// A named input blob does not exist in the workspace
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// Input shapes incompatible with the operator
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    // ========== Internal Errors ==========
    /// Workspace lock poisoned (indicates a panicked writer)
    #[error("workspace lock poisoned")]
    LockPoisoned,

    /// Internal error (indicates a bug)
    #[error("internal error: {0}")]
    Internal(String),
}

impl NetError {
    /// Categorize the error by severity
    ///
    /// Recoverable errors are propagated to the caller as a boolean from
    /// `run()`; fatal errors terminate the operation they occur in.
    pub fn severity(&self) -> Severity {
        match self {
            NetError::UnknownOperatorType(_)
            | NetError::InvalidArgument { .. }
            | NetError::LockPoisoned
            | NetError::Internal(_) => Severity::Fatal,

            NetError::OperatorFailed { .. }
            | NetError::BlobNotFound(_)
            | NetError::ShapeMismatch(_) => Severity::Recoverable,
        }
    }

    /// Check if the caller may act on this error and try again
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

impl<T> From<std::sync::PoisonError<T>> for NetError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        NetError::LockPoisoned
    }
}

/// Error severity, deciding which call path reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Surfaced as a failed run; the caller decides the next step
    Recoverable,
    /// Terminates the surrounding operation immediately
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "Recoverable"),
            Severity::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Result alias used throughout the crate
pub type NetResult<T> = std::result::Result<T, NetError>;
