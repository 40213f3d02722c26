//! Provably-Fair Proof System
//!
//! Commit-reveal protocol for a binary outcome:
//! - Sealed server commitments
//! - Deterministic outcome derivation
//! - Self-contained flip records
//! - Independent verification
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - Secret generation, hash, reveal          │
//! │  outcome.rs      - (secret, client seed, nonce) -> outcome  │
//! │  record.rs       - Resolved flip record (JSON)              │
//! │  verify.rs       - Re-derivation and comparison             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod outcome;
pub mod record;
pub mod verify;

#[cfg(test)]
mod properties;

// Re-export key types
pub use commitment::{
    Commitment, CommitmentManager, RevealedCommitment, ServerSecret, verify_commitment,
};
pub use outcome::{derive, canonical_message, Derivation, Outcome, MESSAGE_SEPARATOR};
pub use record::{FlipRecord, RecordError};
pub use verify::{verify_record, verify_latest, Mismatch, Verification, VerificationResult};
