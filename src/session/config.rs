//! Session Configuration
//!
//! Fixed defaults, overridable at construction or from the environment.

use thiserror::Error;

use crate::proof::commitment::DEFAULT_SECRET_LEN;

/// Default client seed length in bytes.
pub const DEFAULT_CLIENT_SEED_LEN: usize = 16;

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 12;

/// Default starting nonce. The first flip uses `initial_nonce + 1`.
pub const DEFAULT_INITIAL_NONCE: u64 = 0;

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Secret length must be positive.
    #[error("secret length must be at least 1 byte")]
    ZeroSecretLen,

    /// Client seed length must be positive.
    #[error("client seed length must be at least 1 byte")]
    ZeroClientSeedLen,

    /// History must keep at least one entry.
    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,

    /// Event channel needs room for one event.
    #[error("event capacity must be at least 1")]
    ZeroEventCapacity,
}

/// Configuration for a flip session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Server secret length (bytes).
    pub secret_len: usize,
    /// Generated client seed length (bytes).
    pub client_seed_len: usize,
    /// History ledger bound.
    pub history_limit: usize,
    /// Nonce before the first flip.
    pub initial_nonce: u64,
    /// Broadcast channel capacity for session events.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_len: DEFAULT_SECRET_LEN,
            client_seed_len: DEFAULT_CLIENT_SEED_LEN,
            history_limit: DEFAULT_HISTORY_LIMIT,
            initial_nonce: DEFAULT_INITIAL_NONCE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret_len: env_or("FAIR_FLIP_SECRET_BYTES", defaults.secret_len),
            client_seed_len: env_or("FAIR_FLIP_CLIENT_SEED_BYTES", defaults.client_seed_len),
            history_limit: env_or("FAIR_FLIP_HISTORY_LIMIT", defaults.history_limit),
            initial_nonce: env_or("FAIR_FLIP_INITIAL_NONCE", defaults.initial_nonce),
            event_capacity: env_or("FAIR_FLIP_EVENT_CAPACITY", defaults.event_capacity),
        }
    }

    /// Set the secret length.
    pub fn with_secret_len(mut self, len: usize) -> Self {
        self.secret_len = len;
        self
    }

    /// Set the generated client seed length.
    pub fn with_client_seed_len(mut self, len: usize) -> Self {
        self.client_seed_len = len;
        self
    }

    /// Set the history bound.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the starting nonce.
    pub fn with_initial_nonce(mut self, nonce: u64) -> Self {
        self.initial_nonce = nonce;
        self
    }

    /// Set the event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_len == 0 {
            return Err(ConfigError::ZeroSecretLen);
        }
        if self.client_seed_len == 0 {
            return Err(ConfigError::ZeroClientSeedLen);
        }
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
