//! Flip Records
//!
//! Everything needed to independently re-verify one resolved flip.
//! Records are JSON-serializable so they can be audited outside the process.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::proof::commitment::RevealedCommitment;
use crate::proof::outcome::{Derivation, Outcome};

/// Errors decoding an externally supplied record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Input was not a valid record.
    #[error("invalid flip record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resolved flip with its secret disclosed.
///
/// Immutable once built by the session. The verifier checks the stored
/// fields against values it recomputes itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipRecord {
    /// Per-flip counter.
    pub nonce: u64,

    /// Revealed server secret (hex text).
    pub secret: String,

    /// Hash of `secret`, published before the flip.
    pub public_hash: String,

    /// Client seed used for this flip.
    pub client_seed: String,

    /// Canonical hash input.
    pub message: String,

    /// SHA-256 of `message` (lowercase hex).
    pub digest: String,

    /// Leading four digest bytes, big-endian.
    pub derived_value: u32,

    /// Parity of `derived_value`.
    pub outcome: Outcome,

    /// When the flip resolved. Not covered by verification.
    pub resolved_at: DateTime<Utc>,
}

impl FlipRecord {
    /// Assemble a record from a revealed commitment and its derivation.
    pub fn new(
        nonce: u64,
        revealed: RevealedCommitment,
        client_seed: String,
        derivation: Derivation,
    ) -> Self {
        let digest = derivation.digest_hex();
        Self {
            nonce,
            secret: revealed.secret,
            public_hash: revealed.public_hash,
            client_seed,
            message: derivation.message,
            digest,
            derived_value: derivation.derived_value,
            outcome: derivation.outcome,
            resolved_at: Utc::now(),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::commitment::{Commitment, ServerSecret};
    use crate::proof::outcome::derive;

    fn create_test_record() -> FlipRecord {
        let commitment = Commitment::seal(ServerSecret::new("00ff"));
        let derivation = derive(commitment.sealed_secret(), "client", 3);
        FlipRecord::new(3, commitment.reveal(), "client".to_string(), derivation)
    }

    #[test]
    fn test_record_fields() {
        let record = create_test_record();
        assert_eq!(record.nonce, 3);
        assert_eq!(record.secret, "00ff");
        assert_eq!(record.message, "00ff:client:3");
        assert_eq!(record.digest.len(), 64);
        assert_eq!(record.outcome, Outcome::from_derived_value(record.derived_value));
    }

    #[test]
    fn test_json_shape() {
        let record = create_test_record();
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert_eq!(value["nonce"], 3);
        assert_eq!(value["client_seed"], "client");
        assert!(value["outcome"] == "heads" || value["outcome"] == "tails");
    }

    #[test]
    fn test_json_restores_record() {
        let record = create_test_record();
        let restored = FlipRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(FlipRecord::from_json("{\"nonce\": 1}"), Err(RecordError::Json(_))));
        assert!(FlipRecord::from_json("not json").is_err());
    }
}
