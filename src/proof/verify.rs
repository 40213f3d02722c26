//! Verification API
//!
//! Recompute a flip from its disclosed inputs and compare against the record.
//! Integrity failures are results, not errors: auditing untrusted data is
//! expected to find them sometimes.

use std::fmt;
use tracing::{debug, warn};

use crate::core::hash::sha256_hex;
use crate::proof::outcome::{derive, Outcome};
use crate::proof::record::FlipRecord;

/// A stored field that disagrees with the recomputed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// `Hash(secret) != public_hash`.
    PublicHash {
        /// Stored value.
        expected: String,
        /// Recomputed value.
        computed: String,
    },

    /// Stored message is not the canonical message.
    Message {
        /// Stored value.
        expected: String,
        /// Recomputed value.
        computed: String,
    },

    /// Stored digest differs.
    Digest {
        /// Stored value.
        expected: String,
        /// Recomputed value.
        computed: String,
    },

    /// Stored derived value differs.
    DerivedValue {
        /// Stored value.
        expected: u32,
        /// Recomputed value.
        computed: u32,
    },

    /// Stored outcome differs.
    Outcome {
        /// Stored value.
        expected: Outcome,
        /// Recomputed value.
        computed: Outcome,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicHash { .. } => write!(f, "Commitment hash mismatch"),
            Self::Message { expected, computed } => {
                write!(f, "Message mismatch: expected {:?}, computed {:?}", expected, computed)
            }
            Self::Digest { .. } => write!(f, "Result digest mismatch"),
            Self::DerivedValue { expected, computed } => {
                write!(f, "Derived value mismatch: expected {}, computed {}", expected, computed)
            }
            Self::Outcome { expected, computed } => {
                write!(f, "Outcome mismatch: expected {}, computed {}", expected, computed)
            }
        }
    }
}

/// Result of checking one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Nonce of the checked record.
    pub nonce: u64,

    /// `Hash(secret) == public_hash`.
    pub commit_valid: bool,

    /// Message, digest, derived value and outcome all recompute.
    pub result_valid: bool,

    /// Every field that failed.
    pub mismatches: Vec<Mismatch>,
}

impl VerificationResult {
    /// Both checks passed.
    pub fn is_valid(&self) -> bool {
        self.commit_valid && self.result_valid
    }
}

/// Outcome of a verification request.
///
/// Fails closed: with no record there is nothing to verify, which is
/// never reported as success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    /// No flip has completed yet.
    NothingToVerify,
    /// A record was checked.
    Checked(VerificationResult),
}

impl Verification {
    /// True only for a checked record that passed both checks.
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Checked(result) if result.is_valid())
    }

    /// Status line for display.
    pub fn summary(&self) -> &'static str {
        match self {
            Verification::NothingToVerify => "No flip yet.",
            Verification::Checked(result) if result.is_valid() => "Verified (commit + outcome).",
            Verification::Checked(_) => "Verification failed.",
        }
    }
}

/// Verify a record against its own disclosed inputs.
///
/// Uses nothing but the record: no session or history state.
pub fn verify_record(record: &FlipRecord) -> VerificationResult {
    let mut mismatches = Vec::new();

    // 1. Commit integrity
    let computed_hash = sha256_hex(&record.secret);
    let commit_valid = computed_hash == record.public_hash;
    if !commit_valid {
        mismatches.push(Mismatch::PublicHash {
            expected: record.public_hash.clone(),
            computed: computed_hash,
        });
    }

    // 2. Result integrity
    let derivation = derive(&record.secret, &record.client_seed, record.nonce);
    let computed_digest = derivation.digest_hex();
    let mut result_valid = true;

    if derivation.message != record.message {
        result_valid = false;
        mismatches.push(Mismatch::Message {
            expected: record.message.clone(),
            computed: derivation.message,
        });
    }

    if computed_digest != record.digest {
        result_valid = false;
        mismatches.push(Mismatch::Digest {
            expected: record.digest.clone(),
            computed: computed_digest,
        });
    }

    if derivation.derived_value != record.derived_value {
        result_valid = false;
        mismatches.push(Mismatch::DerivedValue {
            expected: record.derived_value,
            computed: derivation.derived_value,
        });
    }

    if derivation.outcome != record.outcome {
        result_valid = false;
        mismatches.push(Mismatch::Outcome {
            expected: record.outcome,
            computed: derivation.outcome,
        });
    }

    if mismatches.is_empty() {
        debug!(nonce = record.nonce, "Flip verified");
    } else {
        for mismatch in &mismatches {
            warn!(nonce = record.nonce, "{}", mismatch);
        }
    }

    VerificationResult {
        nonce: record.nonce,
        commit_valid,
        result_valid,
        mismatches,
    }
}

/// Verify the most recent record, if any.
pub fn verify_latest(record: Option<&FlipRecord>) -> Verification {
    match record {
        Some(record) => Verification::Checked(verify_record(record)),
        None => Verification::NothingToVerify,
    }
}
