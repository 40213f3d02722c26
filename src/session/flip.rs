//! Flip Session
//!
//! State machine for one commit → flip → reveal cycle at a time.
//!
//! ```text
//!   Idle ──start──▶ Committed ──request_flip──▶ Resolving
//!                      ▲                            │
//!                      │                         resolve
//!                      │                            ▼
//!                      └──── new commitment ──── Resolved
//! ```
//!
//! The session is the only owner of the current commitment and the nonce.
//! While a flip is resolving, no other flip can start and the client seed
//! cannot change.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::entropy::{EntropyError, EntropySource, OsEntropy, random_hex};
use crate::proof::commitment::{Commitment, CommitmentManager};
use crate::proof::outcome::{derive, Derivation, Outcome};
use crate::proof::record::FlipRecord;
use crate::proof::verify::{verify_latest, Verification};
use crate::session::config::{ConfigError, SessionConfig};
use crate::session::events::{FlipEvent, RejectionReason};
use crate::session::history::HistoryLedger;

/// Unique session identifier. Changes on reset.
pub type SessionId = Uuid;

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No commitment minted yet.
    Idle,
    /// A sealed commitment is published, waiting for a flip.
    Committed,
    /// Outcome computed, secret still sealed.
    Resolving,
    /// Secret revealed, next commitment not yet minted.
    Resolved,
}

/// Session errors.
#[derive(Debug, Error)]
pub enum FlipError {
    /// Request refused; nothing changed.
    #[error("flip rejected: {0}")]
    Rejected(RejectionReason),

    /// Secure randomness failed. The session cannot commit.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No sealed commitment is current.
    #[error("no commitment is current")]
    NoCommitment,

    /// `resolve` called with no flip in progress.
    #[error("no flip is resolving")]
    NothingPending,

    /// The nonce counter cannot advance.
    #[error("nonce counter exhausted")]
    NonceExhausted,
}

/// Public view of a flip that is resolving.
///
/// The outcome is already fixed; the secret stays sealed until `resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipTicket {
    /// Nonce assigned to this flip.
    pub nonce: u64,
    /// Commitment hash the flip is bound to.
    pub public_hash: String,
    /// Client seed used.
    pub client_seed: String,
    /// Computed outcome.
    pub outcome: Outcome,
}

/// A flip between request and resolution.
#[derive(Debug)]
struct PendingFlip {
    nonce: u64,
    commitment: Commitment,
    client_seed: String,
    derivation: Derivation,
}

impl PendingFlip {
    fn ticket(&self) -> FlipTicket {
        FlipTicket {
            nonce: self.nonce,
            public_hash: self.commitment.public_hash().to_string(),
            client_seed: self.client_seed.clone(),
            outcome: self.derivation.outcome,
        }
    }
}

/// A provably-fair flip session.
pub struct FlipSession {
    /// Unique session identifier.
    id: SessionId,
    /// Session configuration.
    config: SessionConfig,
    /// Current state.
    state: SessionState,
    /// Commitment source.
    commitments: CommitmentManager,
    /// Entropy for client seeds.
    entropy: Arc<dyn EntropySource>,
    /// Sealed commitment awaiting a flip.
    current: Option<Commitment>,
    /// Flip being resolved.
    pending: Option<PendingFlip>,
    /// Client seed for the next flip.
    client_seed: String,
    /// Last nonce handed out.
    nonce: u64,
    /// Display history.
    history: HistoryLedger,
    /// Most recent resolved flip, for verification.
    last_record: Option<FlipRecord>,
    /// Event broadcast channel.
    event_tx: broadcast::Sender<FlipEvent>,
}

impl FlipSession {
    /// Start a session backed by the OS CSPRNG.
    ///
    /// Fails if the configuration is invalid or no secure randomness is available.
    pub fn start(config: SessionConfig) -> Result<Self, FlipError> {
        Self::with_entropy(config, Arc::new(OsEntropy))
    }

    /// Start a session with a custom entropy source.
    pub fn with_entropy(
        config: SessionConfig,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, FlipError> {
        config.validate()?;

        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let client_seed = random_hex(entropy.as_ref(), config.client_seed_len)?;

        let mut session = Self {
            id: Uuid::new_v4(),
            commitments: CommitmentManager::with_source(config.secret_len, Arc::clone(&entropy)),
            entropy,
            state: SessionState::Idle,
            current: None,
            pending: None,
            client_seed,
            nonce: config.initial_nonce,
            history: HistoryLedger::new(config.history_limit),
            last_record: None,
            event_tx,
            config,
        };

        session.mint_commitment()?;
        info!(session = %session.id, "Flip session started");
        Ok(session)
    }

    /// Subscribe to session events.
    ///
    /// Only events sent after subscribing are received.
    pub fn subscribe(&self) -> broadcast::Receiver<FlipEvent> {
        self.event_tx.subscribe()
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Last nonce handed out.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Client seed for the next flip.
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Hash of the commitment currently in play, if any.
    pub fn public_hash(&self) -> Option<&str> {
        match (&self.current, &self.pending) {
            (Some(commitment), _) => Some(commitment.public_hash()),
            (None, Some(pending)) => Some(pending.commitment.public_hash()),
            (None, None) => None,
        }
    }

    /// View of the flip being resolved.
    pub fn pending_ticket(&self) -> Option<FlipTicket> {
        self.pending.as_ref().map(PendingFlip::ticket)
    }

    /// Display history, newest first.
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Most recent resolved flip.
    pub fn last_record(&self) -> Option<&FlipRecord> {
        self.last_record.as_ref()
    }

    /// Replace the client seed. Surrounding whitespace is trimmed.
    ///
    /// An empty seed is accepted here and rejected at flip time.
    pub fn set_client_seed(&mut self, seed: &str) -> Result<(), FlipError> {
        if self.state == SessionState::Resolving {
            return Err(self.reject(RejectionReason::FlipInFlight));
        }
        self.client_seed = seed.trim().to_string();
        debug!(session = %self.id, client_seed = %self.client_seed, "Client seed set");
        Ok(())
    }

    /// Replace the client seed with fresh random hex.
    pub fn randomize_client_seed(&mut self) -> Result<&str, FlipError> {
        if self.state == SessionState::Resolving {
            return Err(self.reject(RejectionReason::FlipInFlight));
        }
        self.client_seed = random_hex(self.entropy.as_ref(), self.config.client_seed_len)?;
        debug!(session = %self.id, client_seed = %self.client_seed, "Client seed randomized");
        Ok(&self.client_seed)
    }

    /// Begin a flip: `Committed → Resolving`.
    ///
    /// Assigns the next nonce and fixes the outcome with the still-sealed
    /// secret. A second request while resolving is rejected and changes nothing.
    pub fn request_flip(&mut self) -> Result<FlipTicket, FlipError> {
        if self.state == SessionState::Resolving {
            return Err(self.reject(RejectionReason::FlipInFlight));
        }

        if self.client_seed.is_empty() {
            return Err(self.reject(RejectionReason::EmptyClientSeed));
        }

        if self.current.is_none() {
            return Err(FlipError::NoCommitment);
        }

        let nonce = self.nonce.checked_add(1).ok_or(FlipError::NonceExhausted)?;
        let commitment = self.current.take().ok_or(FlipError::NoCommitment)?;

        self.nonce = nonce;
        let derivation = derive(commitment.sealed_secret(), &self.client_seed, nonce);
        debug!(
            session = %self.id,
            nonce,
            derived_value = derivation.derived_value,
            "Outcome derived"
        );

        let pending = PendingFlip {
            nonce,
            commitment,
            client_seed: self.client_seed.clone(),
            derivation,
        };
        let ticket = pending.ticket();

        self.pending = Some(pending);
        self.state = SessionState::Resolving;

        info!(session = %self.id, nonce, public_hash = %ticket.public_hash, "Flip requested");
        Ok(ticket)
    }

    /// Finish a flip: `Resolving → Resolved → Committed`.
    ///
    /// Reveals the secret, records the flip, then mints the next commitment.
    /// If minting fails the record is still kept in history and as the last
    /// record, and the session stays `Resolved`.
    pub fn resolve(&mut self) -> Result<FlipRecord, FlipError> {
        let pending = self.pending.take().ok_or(FlipError::NothingPending)?;

        let revealed = self.commitments.reveal(pending.commitment);
        let record = FlipRecord::new(pending.nonce, revealed, pending.client_seed, pending.derivation);

        self.state = SessionState::Resolved;
        self.history.append(record.clone());
        self.last_record = Some(record.clone());

        info!(
            session = %self.id,
            nonce = record.nonce,
            outcome = %record.outcome,
            secret = %record.secret,
            "Flip resolved"
        );
        self.emit(FlipEvent::flip_resolved(record.clone()));

        self.mint_commitment()?;
        Ok(record)
    }

    /// Request and resolve in one step.
    pub fn flip(&mut self) -> Result<FlipRecord, FlipError> {
        self.request_flip()?;
        self.resolve()
    }

    /// Mint a commitment after an earlier entropy failure.
    ///
    /// Returns the current hash unchanged if one is already in play.
    pub fn recommit(&mut self) -> Result<String, FlipError> {
        match self.state {
            SessionState::Resolving => Err(self.reject(RejectionReason::FlipInFlight)),
            SessionState::Committed => self
                .public_hash()
                .map(str::to_string)
                .ok_or(FlipError::NoCommitment),
            SessionState::Idle | SessionState::Resolved => {
                self.mint_commitment()?;
                self.public_hash()
                    .map(str::to_string)
                    .ok_or(FlipError::NoCommitment)
            }
        }
    }

    /// Start over with a new session id.
    ///
    /// Refused while a flip is resolving: its outcome is already fixed and
    /// must be revealed first. Clears history, restores the starting nonce
    /// and mints a fresh commitment. The most recent record survives so it
    /// can still be verified.
    pub fn reset(&mut self) -> Result<(), FlipError> {
        if self.state == SessionState::Resolving {
            return Err(self.reject(RejectionReason::FlipInFlight));
        }

        self.current = None;
        self.history.clear();
        self.nonce = self.config.initial_nonce;
        self.state = SessionState::Idle;

        let previous = std::mem::replace(&mut self.id, Uuid::new_v4());
        info!(previous = %previous, session = %self.id, "Session reset");

        self.mint_commitment()
    }

    /// Verify the most recent resolved flip.
    pub fn verify_last(&self) -> Verification {
        verify_latest(self.last_record.as_ref())
    }

    fn mint_commitment(&mut self) -> Result<(), FlipError> {
        let commitment = self.commitments.generate()?;
        let public_hash = commitment.public_hash().to_string();

        self.current = Some(commitment);
        self.state = SessionState::Committed;

        info!(session = %self.id, public_hash = %public_hash, "Commitment ready");
        self.emit(FlipEvent::commitment_ready(public_hash));
        Ok(())
    }

    fn reject(&self, reason: RejectionReason) -> FlipError {
        warn!(session = %self.id, state = ?self.state, "{}", reason);
        self.emit(FlipEvent::validation_rejected(reason));
        FlipError::Rejected(reason)
    }

    fn emit(&self, event: FlipEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

impl std::fmt::Debug for FlipSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("nonce", &self.nonce)
            .field("public_hash", &self.public_hash())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
