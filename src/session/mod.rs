//! Flip Sessions
//!
//! Stateful orchestration around the proof system. The session owns the
//! current commitment, the nonce counter and the single-flight guard.

pub mod config;
pub mod events;
pub mod flip;
pub mod history;

pub use config::{ConfigError, SessionConfig};
pub use events::{FlipEvent, RejectionReason};
pub use flip::{FlipError, FlipSession, FlipTicket, SessionId, SessionState};
pub use history::HistoryLedger;
