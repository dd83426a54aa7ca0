//! Pipeline error types.
//!
//! Every failure carries an [`ErrorKind`] so retry and propagation policy can
//! dispatch on the kind instead of on the concrete variant.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::content::ContentAddress;
use crate::duel::DuelId;

/// Classification of a failure, used to decide retry and propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input for a single item. Fails the item immediately.
    Validation,
    /// Timeout, rate limit, content still propagating. Retried with backoff.
    Transient,
    /// Upstream refused or returned garbage. Fails the item without retry.
    Permanent,
    /// Authoritative state is inconsistent. Aborts the whole pass.
    Invariant,
}

/// Top-level error type for the roast duel pipeline.
#[derive(Debug, Error)]
pub enum DuelError {
    /// Input failed validation (damage out of range, missing identifier).
    #[error("validation error: {0}")]
    Validation(String),

    /// The ledger has no duel with this identifier.
    #[error("duel not found: {0}")]
    DuelNotFound(DuelId),

    /// The ledger refused to record content for a turn slot.
    #[error("commit rejected for duel {duel_id} turn {turn_index}: {reason}")]
    CommitRejected {
        /// The duel the commit targeted.
        duel_id: DuelId,
        /// The turn slot the commit targeted.
        turn_index: usize,
        /// Reason reported by the ledger.
        reason: String,
    },

    /// The address is valid but the content has not propagated yet.
    #[error("content not yet resolvable: {0}")]
    NotYetResolvable(ContentAddress),

    /// The store has no content for this address.
    #[error("content not found: {0}")]
    ContentNotFound(ContentAddress),

    /// The generation service answered with something unusable.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    /// An upstream service is temporarily unavailable or rate limiting.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// An external call did not finish within its time bound.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// The time bound that elapsed.
        after: Duration,
    },

    /// A non-retryable infrastructure failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// Authoritative state contradicts a pipeline invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DuelError {
    /// Returns the kind used for retry and propagation decisions.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::DuelNotFound(_) => ErrorKind::Validation,
            Self::NotYetResolvable(_) | Self::Unavailable(_) | Self::Timeout { .. } => {
                ErrorKind::Transient
            }
            Self::CommitRejected { .. }
            | Self::ContentNotFound(_)
            | Self::MalformedResponse(_)
            | Self::Infrastructure(_) => ErrorKind::Permanent,
            Self::InvariantViolation(_) => ErrorKind::Invariant,
        }
    }

    /// Whether a retry with backoff may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
