//! # Fair Flip
//!
//! Provably-fair coin flips via commit-reveal, with independent verification.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        FAIR FLIP                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── hash.rs     - SHA-256 helpers                           │
//! │  └── entropy.rs  - OS CSPRNG, no fallback                    │
//! │                                                              │
//! │  proof/          - Commit-reveal protocol (deterministic)    │
//! │  ├── commitment.rs - Sealed secret + public hash             │
//! │  ├── outcome.rs  - Outcome derivation                        │
//! │  ├── record.rs   - Resolved flip record                      │
//! │  └── verify.rs   - Independent verification                  │
//! │                                                              │
//! │  session/        - Orchestration (stateful)                  │
//! │  ├── flip.rs     - Commit → flip → reveal state machine      │
//! │  ├── history.rs  - Bounded newest-first ledger               │
//! │  ├── events.rs   - Presentation notifications                │
//! │  └── config.rs   - Defaults and env overrides                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fairness Guarantee
//!
//! Before each flip the session publishes `SHA-256(secret)`. The outcome is
//! `SHA-256("{secret}:{client_seed}:{nonce}")`, read as a big-endian `u32`
//! and reduced mod 2. After the flip the secret is revealed, so anyone can
//! recompute both hashes from the record alone.
//!
//! Every flip gets a brand-new commitment. The nonce keeps counting for
//! audit continuity, but each flip's fairness rests on its own commitment.
//!
//! ```
//! use fair_flip::{FlipSession, SessionConfig, verify_record};
//!
//! let mut session = FlipSession::start(SessionConfig::default()).unwrap();
//! session.set_client_seed("my-lucky-seed").unwrap();
//!
//! let record = session.flip().unwrap();
//! assert_eq!(record.nonce, 1);
//! assert!(verify_record(&record).is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod proof;
pub mod session;

// Re-export commonly used types
pub use crate::core::entropy::{EntropyError, EntropySource, OsEntropy};
pub use crate::core::hash::{Digest, sha256_hex};
pub use proof::{
    CommitmentManager, Commitment, FlipRecord, Outcome, Verification, VerificationResult,
    derive, verify_record, verify_latest,
};
pub use session::{
    FlipError, FlipEvent, FlipSession, FlipTicket, HistoryLedger, RejectionReason,
    SessionConfig, SessionState,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
