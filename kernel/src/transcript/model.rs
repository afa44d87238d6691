//! `TranscriptV1`: the ordered, hash-chained record of one negotiation,
//! plus its optional terminal outcome (receipt or failure event).
//!
//! The chain of custody is addressed by hash, not by reference: rounds live
//! in an indexed `Vec` and [`TranscriptV1::hash_index`] derives the
//! `round_hash → index` map on demand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transcript::round::RoundV1;

/// Protocol version string written by [`crate::transcript::builder`].
pub const TRANSCRIPT_VERSION: &str = "pact-transcript/1";

/// Closed set of failure codes a negotiation layer may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// A party's policy aborted the negotiation.
    AbortedPolicy,
    /// The provider could not be reached.
    FailedProviderUnreachable,
    /// The provider did not respond within the agreed deadline.
    FailedProviderTimeout,
    /// The provider's delivery proof did not check out.
    FailedProof,
    /// Both parties stopped without agreement.
    FailedNegotiationDeadlock,
    /// The external settlement rail failed.
    FailedSettlement,
}

impl FailureCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AbortedPolicy => "ABORTED_POLICY",
            Self::FailedProviderUnreachable => "FAILED_PROVIDER_UNREACHABLE",
            Self::FailedProviderTimeout => "FAILED_PROVIDER_TIMEOUT",
            Self::FailedProof => "FAILED_PROOF",
            Self::FailedNegotiationDeadlock => "FAILED_NEGOTIATION_DEADLOCK",
            Self::FailedSettlement => "FAILED_SETTLEMENT",
        }
    }
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol stage at which a failure was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureStage {
    Negotiation,
    Commitment,
    Settlement,
    Delivery,
}

/// Terminal receipt for a negotiation that reached settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: String,
    pub fulfilled: bool,
    /// Integer minor units.
    pub agreed_price: u64,
    /// Integer minor units.
    pub paid_amount: u64,
    pub timestamp_ms: u64,
}

/// Terminal failure event reported by the negotiation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEvent {
    pub code: FailureCode,
    pub stage: FailureStage,
    /// Base58 public key of the party the event is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiated_by: Option<String>,
    pub message: String,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub evidence_refs: Vec<String>,
}

/// Error parsing a transcript from bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptParseError {
    #[error("transcript JSON is malformed: {detail}")]
    Json { detail: String },
}

/// A complete negotiation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptV1 {
    pub version: String,
    pub transcript_id: String,
    pub intent_id: String,
    pub created_at_ms: u64,
    pub rounds: Vec<RoundV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_event: Option<FailureEvent>,
    /// Terminal seal binding the last round to the terminal outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_hash: Option<String>,
}

impl TranscriptV1 {
    /// Parse a transcript from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptParseError::Json`] on malformed JSON, unknown
    /// round types, or missing required fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TranscriptParseError> {
        serde_json::from_slice(bytes).map_err(|e| TranscriptParseError::Json {
            detail: e.to_string(),
        })
    }

    /// Serialize to compact JSON bytes (not canonical; field order is
    /// declaration order).
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptParseError::Json`] if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TranscriptParseError> {
        serde_json::to_vec(self).map_err(|e| TranscriptParseError::Json {
            detail: e.to_string(),
        })
    }

    /// Derived `round_hash → index` map. On duplicate hashes the first
    /// occurrence wins.
    #[must_use]
    pub fn hash_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.rounds.len());
        for (i, round) in self.rounds.iter().enumerate() {
            index.entry(round.round_hash.as_str()).or_insert(i);
        }
        index
    }

    /// Look up a round by its declared hash.
    #[must_use]
    pub fn round_by_hash(&self, round_hash: &str) -> Option<&RoundV1> {
        self.rounds.iter().find(|r| r.round_hash == round_hash)
    }

    #[must_use]
    pub fn last_round(&self) -> Option<&RoundV1> {
        self.rounds.last()
    }

    /// Latest timestamp embedded in the transcript (rounds and terminal
    /// outcome), falling back to `created_at_ms`.
    #[must_use]
    pub fn latest_timestamp_ms(&self) -> u64 {
        let rounds = self.rounds.iter().map(|r| r.timestamp_ms);
        let receipt = self.receipt.iter().map(|r| r.timestamp_ms);
        let failure = self.failure_event.iter().map(|f| f.timestamp_ms);
        rounds
            .chain(receipt)
            .chain(failure)
            .max()
            .unwrap_or(self.created_at_ms)
    }
}
