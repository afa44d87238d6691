//! `replay_verify()`: recompute every hash, link and signature of a
//! transcript and report what does not match.
//!
//! Fail-closed and total. A transcript that cannot be checked is reported as
//! `INVALID` (structure) or `INDETERMINATE` (unresolvable key); it is never
//! reported as `VALID` by omission. The verifier never panics and never
//! returns `Err`.
//!
//! # Order
//!
//! 1. Structure: at least one round, required fields present, contiguous
//!    round numbers, every round canonically encodable. Any finding here
//!    stops verification.
//! 2. Chain links against each predecessor's *declared* `round_hash`, so a
//!    rewritten round is localized to itself and a re-hashed one to its
//!    successor's link.
//! 3. Round hash and (when the body is shipped) envelope hash.
//! 4. Signer key, signature, signer consistency, timestamp order.
//! 5. Terminal seal, when present.

use std::collections::HashMap;

use crate::crypto::signature::{decode_public_key_b58, verify_envelope_hash};
use crate::proof::verdict::{
    IntegrityStatus, VerificationError, VerificationErrorKind, VerificationResult,
};
use crate::transcript::chain::{
    chain_seed, compute_final_hash, compute_round_hash, envelope_hash, round_preimage,
};
use crate::transcript::model::TranscriptV1;
use crate::transcript::round::RoundV1;

/// Result of verifying raw bytes: the parsed transcript (if it parsed) and
/// the verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerification {
    pub transcript: Option<TranscriptV1>,
    pub verification: VerificationResult,
}

/// Verify a transcript.
#[must_use]
pub fn replay_verify(transcript: &TranscriptV1) -> VerificationResult {
    let rounds_total = transcript.rounds.len() as u64;

    let structural = check_structure(transcript);
    if !structural.is_empty() {
        for e in &structural {
            tracing::debug!(
                transcript_id = %transcript.transcript_id,
                kind = ?e.kind,
                round = ?e.round_number,
                detail = %e.detail,
                "structural finding"
            );
        }
        return VerificationResult {
            integrity_status: IntegrityStatus::Invalid,
            rounds_total,
            signatures_verified: 0,
            chain_links_verified: 0,
            round_hashes_verified: 0,
            verified_prefix: 0,
            errors: structural,
        };
    }

    let mut pass = RoundPass::new(transcript);
    for (i, round) in transcript.rounds.iter().enumerate() {
        let before = pass.errors.len();
        pass.check_link(i, round);
        pass.check_hashes(round);
        pass.check_signer(i, round);
        pass.clean.push(pass.errors.len() == before);
    }

    if let Some(declared) = &transcript.final_hash {
        match compute_final_hash(transcript) {
            Ok(recomputed) if &recomputed == declared => {}
            Ok(recomputed) => pass.errors.push(VerificationError::transcript(
                VerificationErrorKind::FinalHashMismatch,
                format!("final_hash {declared} does not match recomputed {recomputed}"),
            )),
            Err(e) => pass.errors.push(VerificationError::transcript(
                VerificationErrorKind::FinalHashMismatch,
                format!("terminal outcome is not canonically encodable: {e}"),
            )),
        }
    }

    let integrity_status = pass
        .errors
        .iter()
        .fold(IntegrityStatus::Valid, |acc, e| acc.worst(e.kind.status_impact()));
    let verified_prefix = pass.clean.iter().take_while(|ok| **ok).count() as u64;

    for e in &pass.errors {
        tracing::debug!(
            transcript_id = %transcript.transcript_id,
            kind = ?e.kind,
            round = ?e.round_number,
            detail = %e.detail,
            "integrity finding"
        );
    }
    tracing::debug!(
        transcript_id = %transcript.transcript_id,
        status = %integrity_status,
        rounds_total,
        verified_prefix,
        "transcript verified"
    );

    VerificationResult {
        integrity_status,
        rounds_total,
        signatures_verified: pass.signatures_verified,
        chain_links_verified: pass.chain_links_verified,
        round_hashes_verified: pass.round_hashes_verified,
        verified_prefix,
        errors: pass.errors,
    }
}

/// Parse JSON bytes and verify. Parse failure is `INVALID` with a
/// `MALFORMED_TRANSCRIPT` finding and no transcript.
#[must_use]
pub fn replay_verify_bytes(bytes: &[u8]) -> ParsedVerification {
    match TranscriptV1::from_json_bytes(bytes) {
        Ok(transcript) => {
            let verification = replay_verify(&transcript);
            ParsedVerification {
                transcript: Some(transcript),
                verification,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "transcript bytes rejected");
            ParsedVerification {
                transcript: None,
                verification: VerificationResult {
                    integrity_status: IntegrityStatus::Invalid,
                    rounds_total: 0,
                    signatures_verified: 0,
                    chain_links_verified: 0,
                    round_hashes_verified: 0,
                    verified_prefix: 0,
                    errors: vec![VerificationError::transcript(
                        VerificationErrorKind::MalformedTranscript,
                        e.to_string(),
                    )],
                },
            }
        }
    }
}

fn check_structure(transcript: &TranscriptV1) -> Vec<VerificationError> {
    use VerificationErrorKind::{EmptyTranscript, MissingField, NonCanonicalRound, RoundNumberGap};

    let mut errors = Vec::new();
    for (name, value) in [
        ("version", &transcript.version),
        ("transcript_id", &transcript.transcript_id),
        ("intent_id", &transcript.intent_id),
    ] {
        if value.is_empty() {
            errors.push(VerificationError::transcript(
                MissingField,
                format!("{name} is empty"),
            ));
        }
    }
    if transcript.rounds.is_empty() {
        errors.push(VerificationError::transcript(
            EmptyTranscript,
            "transcript has no rounds".to_string(),
        ));
    }

    for (i, round) in transcript.rounds.iter().enumerate() {
        let n = round.round_number;
        if n != i as u64 {
            errors.push(VerificationError::at_round(
                RoundNumberGap,
                n,
                format!("round at position {i} is numbered {n}"),
            ));
        }
        for (name, value) in required_fields(round) {
            if value.is_empty() {
                errors.push(VerificationError::at_round(
                    MissingField,
                    n,
                    format!("{name} is empty"),
                ));
            }
        }
        if let Err(e) = round_preimage(round) {
            errors.push(VerificationError::at_round(NonCanonicalRound, n, e.to_string()));
        }
    }
    errors
}

fn required_fields(round: &RoundV1) -> [(&'static str, &str); 6] {
    [
        ("agent_id", round.agent_id.as_str()),
        ("public_key_b58", round.public_key_b58.as_str()),
        ("envelope_hash", round.envelope_hash.as_str()),
        ("previous_round_hash", round.previous_round_hash.as_str()),
        ("signature_b58", round.signature_b58.as_str()),
        ("round_hash", round.round_hash.as_str()),
    ]
}

/// Accumulator for the per-round passes.
struct RoundPass<'a> {
    transcript: &'a TranscriptV1,
    seed: String,
    index: HashMap<&'a str, usize>,
    agent_keys: HashMap<&'a str, &'a str>,
    errors: Vec<VerificationError>,
    clean: Vec<bool>,
    signatures_verified: u64,
    chain_links_verified: u64,
    round_hashes_verified: u64,
}

impl<'a> RoundPass<'a> {
    fn new(transcript: &'a TranscriptV1) -> Self {
        Self {
            transcript,
            seed: chain_seed(&transcript.intent_id, transcript.created_at_ms),
            index: transcript.hash_index(),
            agent_keys: HashMap::new(),
            errors: Vec::new(),
            clean: Vec::with_capacity(transcript.rounds.len()),
            signatures_verified: 0,
            chain_links_verified: 0,
            round_hashes_verified: 0,
        }
    }

    fn push(&mut self, kind: VerificationErrorKind, round: &RoundV1, detail: String) {
        self.errors
            .push(VerificationError::at_round(kind, round.round_number, detail));
    }

    fn check_link(&mut self, i: usize, round: &RoundV1) {
        let transcript = self.transcript;
        let expected = match i.checked_sub(1) {
            Some(prev) => transcript.rounds[prev].round_hash.as_str(),
            None => self.seed.as_str(),
        };
        if round.previous_round_hash == expected {
            self.chain_links_verified += 1;
            return;
        }
        let points_at = match self.index.get(round.previous_round_hash.as_str()) {
            Some(j) => format!(" (links to round {j})"),
            None if round.previous_round_hash == self.seed => " (links to chain seed)".to_string(),
            None => " (links to no known round)".to_string(),
        };
        let detail = format!(
            "previous_round_hash {} != expected {expected}{points_at}",
            round.previous_round_hash
        );
        self.push(VerificationErrorKind::ChainBreak, round, detail);
    }

    fn check_hashes(&mut self, round: &RoundV1) {
        match compute_round_hash(round) {
            Ok(h) if h == round.round_hash => self.round_hashes_verified += 1,
            Ok(h) => self.push(
                VerificationErrorKind::RoundHashMismatch,
                round,
                format!("round_hash {} != recomputed {h}", round.round_hash),
            ),
            Err(e) => self.push(VerificationErrorKind::RoundHashMismatch, round, e.to_string()),
        }

        if let Some(message) = &round.message {
            match envelope_hash(message) {
                Ok(h) if h == round.envelope_hash => {}
                Ok(h) => self.push(
                    VerificationErrorKind::EnvelopeHashMismatch,
                    round,
                    format!("envelope_hash {} != recomputed {h}", round.envelope_hash),
                ),
                Err(e) => self.push(
                    VerificationErrorKind::EnvelopeHashMismatch,
                    round,
                    e.to_string(),
                ),
            }
        }
    }

    fn check_signer(&mut self, i: usize, round: &'a RoundV1) {
        match decode_public_key_b58(&round.public_key_b58) {
            Err(e) => self.push(
                VerificationErrorKind::KeyUnresolvable,
                round,
                format!("public key cannot be resolved: {e}"),
            ),
            Ok(_) => {
                if verify_envelope_hash(
                    &round.envelope_hash,
                    &round.signature_b58,
                    &round.public_key_b58,
                ) {
                    self.signatures_verified += 1;
                } else {
                    self.push(
                        VerificationErrorKind::SignatureInvalid,
                        round,
                        format!("signature does not verify under {}", round.public_key_b58),
                    );
                }
            }
        }

        let known = *self
            .agent_keys
            .entry(round.agent_id.as_str())
            .or_insert(round.public_key_b58.as_str());
        if known != round.public_key_b58 {
            let detail = format!(
                "agent {} signed with {} after {known}",
                round.agent_id, round.public_key_b58
            );
            self.push(VerificationErrorKind::SignerMismatch, round, detail);
        }

        let transcript = self.transcript;
        if let Some(prev) = i.checked_sub(1).map(|p| &transcript.rounds[p]) {
            if round.timestamp_ms < prev.timestamp_ms {
                let detail = format!(
                    "timestamp {} is earlier than round {}'s {}",
                    round.timestamp_ms, prev.round_number, prev.timestamp_ms
                );
                self.push(VerificationErrorKind::TimestampRegression, round, detail);
            }
        }
    }
}
