//! Property tests for derivation determinism and verification soundness.
//!
//! 1. **Determinism**: the same `(secret, client_seed, nonce)` always derives
//!    the same digest, value and outcome.
//!
//! 2. **Soundness**: an untouched record verifies; changing any single
//!    covered field makes the matching check fail.

use proptest::prelude::*;
use std::sync::Arc;

use crate::core::entropy::OsEntropy;
use crate::core::hash::sha256_hex;
use crate::proof::commitment::{Commitment, CommitmentManager, ServerSecret};
use crate::proof::outcome::derive;
use crate::proof::record::FlipRecord;
use crate::proof::verify::verify_record;
use crate::session::{FlipSession, SessionConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Generators
// ─────────────────────────────────────────────────────────────────────────────

/// Hex text secret of 0..=32 bytes.
fn arb_secret() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 0..=32).prop_map(hex::encode)
}

/// Non-empty client seed without surrounding whitespace.
fn arb_client_seed() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,24}"
}

fn arb_record() -> impl Strategy<Value = FlipRecord> {
    (arb_secret(), arb_client_seed(), 1u64..1_000_000).prop_map(|(secret, seed, nonce)| {
        let commitment = Commitment::seal(ServerSecret::new(secret));
        let derivation = derive(commitment.sealed_secret(), &seed, nonce);
        FlipRecord::new(nonce, commitment.reveal(), seed, derivation)
    })
}

proptest! {
    #[test]
    fn prop_derivation_deterministic(
        secret in arb_secret(),
        seed in arb_client_seed(),
        nonce in any::<u64>(),
    ) {
        let first = derive(&secret, &seed, nonce);
        let second = derive(&secret, &seed, nonce);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_untouched_record_verifies(record in arb_record()) {
        let result = verify_record(&record);
        prop_assert!(result.commit_valid);
        prop_assert!(result.result_valid);
    }

    #[test]
    fn prop_tampered_secret_fails(record in arb_record(), extra in "[0-9a-f]{2}") {
        let mut tampered = record;
        tampered.secret.push_str(&extra);
        prop_assert!(!verify_record(&tampered).commit_valid);
    }

    #[test]
    fn prop_tampered_public_hash_fails(record in arb_record(), other in arb_secret()) {
        prop_assume!(other != record.secret);
        let mut tampered = record;
        tampered.public_hash = sha256_hex(&other);
        let result = verify_record(&tampered);
        prop_assert!(!result.commit_valid);
        prop_assert!(result.result_valid);
    }

    #[test]
    fn prop_tampered_client_seed_fails(record in arb_record(), seed in arb_client_seed()) {
        prop_assume!(seed != record.client_seed);
        let mut tampered = record;
        tampered.client_seed = seed;
        let result = verify_record(&tampered);
        prop_assert!(result.commit_valid);
        prop_assert!(!result.result_valid);
    }

    #[test]
    fn prop_tampered_nonce_fails(record in arb_record(), delta in 1u64..1000) {
        let mut tampered = record;
        tampered.nonce += delta;
        prop_assert!(!verify_record(&tampered).result_valid);
    }

    #[test]
    fn prop_tampered_digest_fails(record in arb_record(), other in arb_secret()) {
        let forged = sha256_hex(&other);
        prop_assume!(forged != record.digest);
        let mut tampered = record;
        tampered.digest = forged;
        prop_assert!(!verify_record(&tampered).result_valid);
    }

    #[test]
    fn prop_tampered_derived_value_fails(record in arb_record(), delta in 1u32..=u32::MAX) {
        let mut tampered = record;
        tampered.derived_value = tampered.derived_value.wrapping_add(delta);
        prop_assert!(!verify_record(&tampered).result_valid);
    }

    #[test]
    fn prop_tampered_outcome_fails(record in arb_record()) {
        let mut tampered = record;
        tampered.outcome = tampered.outcome.flipped();
        let result = verify_record(&tampered);
        prop_assert!(result.commit_valid);
        prop_assert!(!result.result_valid);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_commitment_integrity(secret_len in 1usize..=64) {
        let manager = CommitmentManager::with_source(secret_len, Arc::new(OsEntropy));
        let revealed = manager.generate().unwrap().reveal();
        prop_assert_eq!(revealed.secret.len(), secret_len * 2);
        prop_assert_eq!(sha256_hex(&revealed.secret), revealed.public_hash);
    }

    #[test]
    fn prop_session_nonce_and_history(flips in 1usize..40, limit in 1usize..16) {
        let config = SessionConfig::default().with_history_limit(limit);
        let mut session = FlipSession::start(config).unwrap();

        for expected in 1..=flips as u64 {
            let record = session.flip().unwrap();
            prop_assert_eq!(record.nonce, expected);
        }

        let nonces: Vec<u64> = session.history().entries().map(|r| r.nonce).collect();
        let kept = flips.min(limit) as u64;
        let expected: Vec<u64> = ((flips as u64 - kept + 1)..=flips as u64).rev().collect();
        prop_assert_eq!(nonces, expected);
        prop_assert!(session.verify_last().is_verified());
    }
}
