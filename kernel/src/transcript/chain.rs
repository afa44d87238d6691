//! Chain rules: seed, envelope hash, round hash, terminal seal.
//!
//! All four are wire digests (`hex(sha256(canonical_bytes))`):
//!
//! - `hash0 = H(canon(intent_id + ":" + created_at_ms))`, the canonical
//!   form of that *string*, quotes included.
//! - `envelope_hash = H(canon(message))`
//! - `round_hash = H(canon(round \ {round_hash}))`
//! - `final_hash = H(canon({failure_event, last_round_hash, receipt, transcript_id}))`

use serde_json::{json, Value};

use crate::codec::canon::{canonical_json_bytes, CanonError};
use crate::codec::hash::{sha256_hex, wire_digest};
use crate::transcript::model::TranscriptV1;
use crate::transcript::round::RoundV1;

/// Key excluded from the round-hash pre-image.
const ROUND_HASH_FIELD: &str = "round_hash";

/// Chain seed for round 0's `previous_round_hash`.
#[must_use]
pub fn chain_seed(intent_id: &str, created_at_ms: u64) -> String {
    let seed_input = Value::String(format!("{intent_id}:{created_at_ms}"));
    // A bare string is always canonicalizable.
    canonical_json_bytes(&seed_input)
        .map(|bytes| sha256_hex(&bytes))
        .unwrap_or_default()
}

/// Envelope hash of a message body.
///
/// # Errors
///
/// Returns [`CanonError`] if the message contains non-integer numbers.
pub fn envelope_hash(message: &Value) -> Result<String, CanonError> {
    wire_digest(message)
}

/// Canonical bytes of a round with `round_hash` removed.
///
/// # Errors
///
/// Returns [`CanonError`] if any field (summary, message, extensions) is not
/// canonically encodable.
pub fn round_preimage(round: &RoundV1) -> Result<Vec<u8>, CanonError> {
    let mut value = serde_json::to_value(round).map_err(|e| CanonError::NotRepresentable {
        detail: e.to_string(),
    })?;
    if let Value::Object(map) = &mut value {
        map.remove(ROUND_HASH_FIELD);
    }
    canonical_json_bytes(&value)
}

/// Recompute a round's hash from its content.
///
/// # Errors
///
/// See [`round_preimage`].
pub fn compute_round_hash(round: &RoundV1) -> Result<String, CanonError> {
    Ok(sha256_hex(&round_preimage(round)?))
}

/// Recompute the terminal seal of a transcript.
///
/// Binds the last round's declared hash to the receipt and failure event,
/// so the terminal outcome cannot be swapped without breaking the seal.
///
/// # Errors
///
/// Returns [`CanonError`] if the terminal outcome is not canonically encodable.
pub fn compute_final_hash(transcript: &TranscriptV1) -> Result<String, CanonError> {
    let last_round_hash = transcript
        .last_round()
        .map_or("", |r| r.round_hash.as_str());
    let to_value = |v: Result<Value, serde_json::Error>| {
        v.map_err(|e| CanonError::NotRepresentable {
            detail: e.to_string(),
        })
    };
    let receipt = to_value(serde_json::to_value(&transcript.receipt))?;
    let failure_event = to_value(serde_json::to_value(&transcript.failure_event))?;
    wire_digest(&json!({
        "failure_event": failure_event,
        "last_round_hash": last_round_hash,
        "receipt": receipt,
        "transcript_id": transcript.transcript_id,
    }))
}
