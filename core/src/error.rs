//! # Shared Error Taxonomy
//!
//! The workflow modules each define a step-tagged error enum; this module
//! holds the vocabulary those enums share.
//!
//! [`CollaboratorError`] is the single failure type every collaborator
//! trait returns. It names the service that failed and whether the failure
//! was transient, terminal, or a timeout: the collaborator's own signal,
//! passed through rather than reinterpreted. The core never retries on its
//! own: funding-source registration and transfer execution are not
//! idempotent, so retry policy belongs to the caller.
//!
//! [`ErrorClass`] is the coarse classification callers dispatch on:
//!
//! - **Validation** — malformed input, safe to reject immediately.
//! - **Collaborator** — a remote system failed; the caller may retry the
//!   whole operation if the failure was transient *and* no side effect
//!   stuck.
//! - **Integrity** — decoded or stored data violates an invariant.
//! - **PartialSuccess** — an irreversible external effect happened and a
//!   later step failed. Must reach reconciliation, must never be
//!   blind-retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// The external system a failed call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Service {
    /// The bank-data aggregator (credential exchange, account metadata,
    /// processor tokens).
    Aggregator,
    /// The payment rail (funding sources, money movement).
    PaymentRail,
    /// The persistence store (linked accounts, transaction records).
    Store,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aggregator => write!(f, "aggregator"),
            Self::PaymentRail => write!(f, "payment rail"),
            Self::Store => write!(f, "store"),
        }
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// How a collaborator reported its failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The collaborator signalled a retryable condition (rate limit,
    /// temporary outage). Whether a retry is *safe* depends on the step.
    Transient,
    /// The collaborator rejected the request outright (invalid credential,
    /// insufficient funds, unknown record).
    Terminal,
    /// The caller-imposed deadline for the remote call elapsed.
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Terminal => write!(f, "terminal"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// CollaboratorError
// ---------------------------------------------------------------------------

/// A failure reported by one of the three external collaborators.
///
/// Collaborator implementations map their SDK/HTTP errors into this type at
/// the boundary; the workflows wrap it into a step-tagged variant so the
/// caller knows both *which step* and *which service* failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{service}: {message} ({kind})")]
pub struct CollaboratorError {
    /// Which service produced the failure.
    pub service: Service,
    /// The collaborator's own transient/terminal/timeout signal.
    pub kind: FailureKind,
    /// Human-readable detail from the collaborator.
    pub message: String,
}

impl CollaboratorError {
    /// A retryable failure reported by `service`.
    pub fn transient(service: Service, message: impl Into<String>) -> Self {
        Self {
            service,
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    /// A non-retryable rejection reported by `service`.
    pub fn terminal(service: Service, message: impl Into<String>) -> Self {
        Self {
            service,
            kind: FailureKind::Terminal,
            message: message.into(),
        }
    }

    /// A deadline expiry on a call to `service`.
    pub fn timeout(service: Service, message: impl Into<String>) -> Self {
        Self {
            service,
            kind: FailureKind::Timeout,
            message: message.into(),
        }
    }

    /// Whether the collaborator itself considers this failure retryable.
    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

// ---------------------------------------------------------------------------
// ErrorClass
// ---------------------------------------------------------------------------

/// Coarse classification of a workflow failure. Obtained via the `class()`
/// method on each workflow error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Malformed or unresolvable caller input. Nothing happened remotely.
    Validation,
    /// A collaborator failed. The step tag on the concrete error says how
    /// far the workflow got.
    Collaborator,
    /// Data read back from a collaborator violates a core invariant.
    Integrity,
    /// An irreversible external effect occurred before the failure. The
    /// concrete error carries what already succeeded; route it to
    /// reconciliation.
    PartialSuccess,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Collaborator => write!(f, "collaborator"),
            Self::Integrity => write!(f, "integrity"),
            Self::PartialSuccess => write!(f, "partial-success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_error_display_names_service_and_kind() {
        let err = CollaboratorError::terminal(Service::Aggregator, "public token expired");
        assert_eq!(err.to_string(), "aggregator: public token expired (terminal)");

        let err = CollaboratorError::timeout(Service::PaymentRail, "no response in 5s");
        assert_eq!(err.to_string(), "payment rail: no response in 5s (timeout)");
    }

    #[test]
    fn transient_flag_follows_kind() {
        assert!(CollaboratorError::transient(Service::Store, "rate limited").is_transient());
        assert!(!CollaboratorError::terminal(Service::Store, "duplicate id").is_transient());
        assert!(!CollaboratorError::timeout(Service::Store, "deadline").is_transient());
    }

    #[test]
    fn error_class_serde_roundtrip() {
        for class in [
            ErrorClass::Validation,
            ErrorClass::Collaborator,
            ErrorClass::Integrity,
            ErrorClass::PartialSuccess,
        ] {
            let json = serde_json::to_string(&class).unwrap();
            let back: ErrorClass = serde_json::from_str(&json).unwrap();
            assert_eq!(class, back);
        }
    }
}
