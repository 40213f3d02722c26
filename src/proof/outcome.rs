//! Outcome Derivation
//!
//! Pure function from `(secret, client_seed, nonce)` to a coin outcome.
//!
//! ```text
//! message  = "{secret}:{client_seed}:{nonce}"
//! digest   = SHA-256(message)
//! value    = u32 big-endian from digest[0..4]
//! outcome  = value % 2  (0 = HEADS, 1 = TAILS)
//! ```
//!
//! 2^32 is even, so the split over the digest value space is exactly 50/50.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::core::hash::{Digest, sha256_text, leading_u32};

/// Separator between message fields.
pub const MESSAGE_SEPARATOR: char = ':';

/// Binary coin outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Outcome {
    /// Even derived value.
    Heads = 0,
    /// Odd derived value.
    Tails = 1,
}

impl Outcome {
    /// Map a derived value to an outcome by parity.
    #[inline]
    pub fn from_derived_value(value: u32) -> Self {
        if value % 2 == 0 {
            Outcome::Heads
        } else {
            Outcome::Tails
        }
    }

    /// Numeric form (0 or 1).
    #[inline]
    pub fn as_bit(self) -> u8 {
        self as u8
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Heads => "HEADS",
            Outcome::Tails => "TAILS",
        }
    }

    /// The other face.
    pub fn flipped(self) -> Self {
        match self {
            Outcome::Heads => Outcome::Tails,
            Outcome::Tails => Outcome::Heads,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything derived from one `(secret, client_seed, nonce)` triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation {
    /// Canonical hash input.
    pub message: String,
    /// SHA-256 of `message`.
    pub digest: Digest,
    /// Leading four digest bytes, big-endian.
    pub derived_value: u32,
    /// Parity of `derived_value`.
    pub outcome: Outcome,
}

impl Derivation {
    /// Digest as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Build the canonical message for a flip.
///
/// The nonce is rendered in plain decimal.
pub fn canonical_message(secret: &str, client_seed: &str, nonce: u64) -> String {
    format!(
        "{secret}{sep}{client_seed}{sep}{nonce}",
        sep = MESSAGE_SEPARATOR
    )
}

/// Derive the outcome of a flip.
pub fn derive(secret: &str, client_seed: &str, nonce: u64) -> Derivation {
    let message = canonical_message(secret, client_seed, nonce);
    let digest = sha256_text(&message);
    let derived_value = leading_u32(&digest);

    Derivation {
        message,
        digest,
        derived_value,
        outcome: Outcome::from_derived_value(derived_value),
    }
}

// =============================================================================
// TESTS
// =============================================================================
