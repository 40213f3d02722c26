//! Session Events
//!
//! Notifications for the presentation layer, sent right after each transition.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::proof::record::FlipRecord;

/// Why a flip request (or seed change) was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Client seed is empty after trimming.
    EmptyClientSeed,
    /// Another flip is still resolving.
    FlipInFlight,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyClientSeed => write!(f, "Please set a client seed first"),
            Self::FlipInFlight => write!(f, "A flip is already in progress"),
        }
    }
}

/// Session notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlipEvent {
    /// A new sealed commitment is current.
    CommitmentReady {
        /// Hash to display. The secret is never sent here.
        public_hash: String,
    },

    /// A flip resolved and its secret is revealed.
    FlipResolved {
        /// The finalized record.
        record: Box<FlipRecord>,
    },

    /// A request was refused without changing state.
    ValidationRejected {
        /// Refusal cause.
        reason: RejectionReason,
    },
}

impl FlipEvent {
    /// Create commitment ready event.
    pub fn commitment_ready(public_hash: impl Into<String>) -> Self {
        Self::CommitmentReady { public_hash: public_hash.into() }
    }

    /// Create flip resolved event.
    pub fn flip_resolved(record: FlipRecord) -> Self {
        Self::FlipResolved { record: Box::new(record) }
    }

    /// Create validation rejected event.
    pub fn validation_rejected(reason: RejectionReason) -> Self {
        Self::ValidationRejected { reason }
    }
}
