//! Fair Flip
//!
//! Runs a demonstration session, or verifies a saved flip record:
//!
//! ```text
//! fair-flip                 # demo: flips, history, verification, tamper check
//! fair-flip verify <file>   # verify a JSON flip record
//! ```

use anyhow::{bail, Context};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fair_flip::{
    FlipEvent, FlipRecord, FlipSession, SessionConfig, Verification, VERSION,
    verify_record,
};

/// Flips performed by the demo.
const DEMO_FLIPS: usize = 15;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Fair Flip v{}", VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => demo_session(),
        [cmd, path] if cmd == "verify" => verify_file(path),
        _ => bail!("usage: fair-flip [verify <record.json>]"),
    }
}

/// Tally of drained notifications.
#[derive(Debug, Default, PartialEq, Eq)]
struct EventCounts {
    resolved: usize,
    commitments: usize,
    rejected: usize,
    dropped: u64,
}

/// Drain every queued event. A lagging receiver logs the gap and keeps going.
fn drain_events(events: &mut broadcast::Receiver<FlipEvent>) -> EventCounts {
    let mut counts = EventCounts::default();
    loop {
        match events.try_recv() {
            Ok(FlipEvent::FlipResolved { .. }) => counts.resolved += 1,
            Ok(FlipEvent::CommitmentReady { .. }) => counts.commitments += 1,
            Ok(FlipEvent::ValidationRejected { .. }) => counts.rejected += 1,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event receiver lagged, oldest events dropped");
                counts.dropped += skipped;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    counts
}

/// Verify a record saved as JSON.
fn verify_file(path: &str) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path))?;
    let record = FlipRecord::from_json(&json)?;

    let result = verify_record(&record);
    info!("Nonce: {}", record.nonce);
    info!("Commit valid: {}", result.commit_valid);
    info!("Result valid: {}", result.result_valid);

    let verification = Verification::Checked(result);
    if !verification.is_verified() {
        bail!("{}", verification.summary());
    }

    info!("{}", verification.summary());
    Ok(())
}

/// Demo function to exercise a full session.
fn demo_session() -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let config = SessionConfig::from_env();
    let mut session = FlipSession::start(config)?;
    let mut events = session.subscribe();

    info!("Session: {}", session.id());
    info!("Client Seed: {}", session.client_seed());
    if let Some(hash) = session.public_hash() {
        info!("Server Hash: {}", hash);
    }

    info!("Verify before any flip: {}", session.verify_last().summary());

    for _ in 0..DEMO_FLIPS {
        let ticket = session.request_flip()?;

        // A second request while resolving must be refused
        if session.request_flip().is_ok() {
            bail!("single-flight guard did not hold");
        }

        let record = session.resolve()?;
        info!(
            "Flip #{}: {} (roll {}) committed to {} -> revealed {}",
            record.nonce,
            record.outcome,
            record.derived_value,
            &ticket.public_hash[..16],
            &record.secret[..16.min(record.secret.len())],
        );
    }

    // Drain notifications
    let counts = drain_events(&mut events);
    info!(
        "Events: {} resolved, {} commitments, {} rejected, {} dropped",
        counts.resolved, counts.commitments, counts.rejected, counts.dropped
    );

    // Print history
    info!("=== History (newest first) ===");
    info!("{:>5}  {:<6} {:>10}  {}", "nonce", "result", "roll", "digest");
    for record in session.history().entries() {
        info!(
            "{:>5}  {:<6} {:>10}  {}",
            record.nonce, record.outcome, record.derived_value, record.digest
        );
    }

    // Verify latest flip
    info!("=== Verifying Last Flip ===");
    let verification = session.verify_last();
    info!("{}", verification.summary());

    let Some(last) = session.last_record().cloned() else {
        bail!("no flip recorded");
    };
    info!("Record JSON:\n{}", last.to_json()?);

    // Tampering must be detected
    let mut tampered = last;
    tampered.outcome = tampered.outcome.flipped();
    let result = verify_record(&tampered);
    if result.is_valid() {
        bail!("tampered record passed verification");
    }
    warn!("Tampered record rejected: {} mismatch(es)", result.mismatches.len());

    // Empty client seed is rejected without consuming a nonce
    let nonce = session.nonce();
    session.set_client_seed("")?;
    if let Err(e) = session.flip() {
        info!("Rejected as expected: {}", e);
    }
    if session.nonce() != nonce {
        bail!("rejected flip consumed a nonce");
    }

    session.reset()?;
    info!("Session reset: {} (nonce {})", session.id(), session.nonce());

    Ok(())
}
