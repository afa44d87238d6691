//! `RoundV1`: one signed, hash-linked step of a negotiation.

use serde::{Deserialize, Serialize};

/// Closed set of round types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Intent,
    Ask,
    Bid,
    Commit,
    Reveal,
    Counter,
    Accept,
    Reject,
    Abort,
    StreamChunk,
}

impl RoundType {
    /// Wire name (`"INTENT"`, `"STREAM_CHUNK"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intent => "INTENT",
            Self::Ask => "ASK",
            Self::Bid => "BID",
            Self::Commit => "COMMIT",
            Self::Reveal => "REVEAL",
            Self::Counter => "COUNTER",
            Self::Accept => "ACCEPT",
            Self::Reject => "REJECT",
            Self::Abort => "ABORT",
            Self::StreamChunk => "STREAM_CHUNK",
        }
    }
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single round of a transcript.
///
/// `round_hash` covers every other field, including any unknown fields kept
/// in `extensions`, so a newer producer's additions stay under the hash.
/// The signature covers only the envelope hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundV1 {
    /// 0-based position; must equal the round's index.
    pub round_number: u64,
    pub round_type: RoundType,
    pub agent_id: String,
    /// Signer's raw 32-byte Ed25519 key, base58.
    pub public_key_b58: String,
    pub timestamp_ms: u64,
    /// `hex(sha256(canonical(message)))`.
    pub envelope_hash: String,
    /// Full message body, when the producer ships it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<serde_json::Value>,
    /// Predecessor's `round_hash`, or the chain seed for round 0.
    pub previous_round_hash: String,
    /// Detached signature over the raw envelope-hash bytes, base58.
    pub signature_b58: String,
    pub content_summary: serde_json::Value,
    /// `hex(sha256(canonical(round minus round_hash)))`.
    pub round_hash: String,
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl RoundV1 {
    /// Short human-readable label, e.g. `"ASK by provider-1"`.
    #[must_use]
    pub fn summary_label(&self) -> String {
        format!("{} by {}", self.round_type, self.agent_id)
    }
}
