//! Server Commitment Protocol
//!
//! Commit to a server secret before the flip.
//! Reveal the secret after the outcome is fixed so anyone can check it.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::core::entropy::{EntropyError, EntropySource, OsEntropy, random_hex};
use crate::core::hash::sha256_hex;

/// Default secret length in bytes.
pub const DEFAULT_SECRET_LEN: usize = 32;

/// Server secret, carried as lowercase hex text.
///
/// `Debug` is redacted so a sealed secret never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSecret(String);

impl ServerSecret {
    /// Wrap an existing hex text secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The secret text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the secret text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(<sealed>)")
    }
}

/// A sealed commitment: the secret plus its public hash.
///
/// Only `public_hash` may be shown before the flip resolves.
/// `reveal` consumes the commitment, so it can be revealed once.
#[derive(Debug, PartialEq, Eq)]
pub struct Commitment {
    secret: ServerSecret,
    public_hash: String,
}

impl Commitment {
    /// Seal a known secret.
    pub fn seal(secret: ServerSecret) -> Self {
        let public_hash = sha256_hex(secret.as_str());
        Self { secret, public_hash }
    }

    /// Public hash, safe to disclose.
    pub fn public_hash(&self) -> &str {
        &self.public_hash
    }

    /// Sealed secret, for in-crate outcome derivation only.
    pub(crate) fn sealed_secret(&self) -> &str {
        self.secret.as_str()
    }

    /// Open the commitment.
    pub fn reveal(self) -> RevealedCommitment {
        RevealedCommitment {
            secret: self.secret.into_string(),
            public_hash: self.public_hash,
        }
    }
}

/// A commitment whose secret has been disclosed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealedCommitment {
    /// Disclosed secret.
    pub secret: String,
    /// Hash published before the flip.
    pub public_hash: String,
}

impl RevealedCommitment {
    /// Check that the secret hashes to the published value.
    pub fn verify(&self) -> bool {
        verify_commitment(&self.secret, &self.public_hash)
    }
}

/// Check a secret against its published hash.
pub fn verify_commitment(secret: &str, public_hash: &str) -> bool {
    sha256_hex(secret) == public_hash
}

/// Mints fresh commitments from a secure entropy source.
///
/// Has no knowledge of flip state. Reveal timing is enforced by the session.
#[derive(Clone)]
pub struct CommitmentManager {
    secret_len: usize,
    source: Arc<dyn EntropySource>,
}

impl CommitmentManager {
    /// Create a manager backed by the OS CSPRNG.
    pub fn new(secret_len: usize) -> Self {
        Self::with_source(secret_len, Arc::new(OsEntropy))
    }

    /// Create a manager backed by a custom entropy source.
    pub fn with_source(secret_len: usize, source: Arc<dyn EntropySource>) -> Self {
        Self { secret_len, source }
    }

    /// Secret length in bytes.
    pub fn secret_len(&self) -> usize {
        self.secret_len
    }

    /// Draw a new secret and seal it.
    pub fn generate(&self) -> Result<Commitment, EntropyError> {
        let secret = random_hex(self.source.as_ref(), self.secret_len)?;
        let commitment = Commitment::seal(ServerSecret::new(secret));
        debug!(public_hash = %commitment.public_hash(), "Generated commitment");
        Ok(commitment)
    }

    /// Disclose a commitment's secret.
    pub fn reveal(&self, commitment: Commitment) -> RevealedCommitment {
        commitment.reveal()
    }
}

impl Default for CommitmentManager {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_LEN)
    }
}

impl fmt::Debug for CommitmentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitmentManager")
            .field("secret_len", &self.secret_len)
            .finish_non_exhaustive()
    }
}
