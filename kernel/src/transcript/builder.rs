//! `TranscriptBuilder`: the honest-producer side of the chain rules.
//!
//! Appends rounds one at a time, computing the envelope hash, detached
//! signature, previous-round link and round hash for each, then seals the
//! terminal outcome. Everything the replay verifier recomputes is produced
//! here by the same functions in [`crate::transcript::chain`].

use serde_json::Value;

use crate::codec::canon::CanonError;
use crate::crypto::signature::{public_key_b58, sign_envelope_hash, CryptoError, SigningKey};
use crate::transcript::chain::{chain_seed, compute_final_hash, compute_round_hash, envelope_hash};
use crate::transcript::model::{FailureEvent, Receipt, TranscriptV1, TRANSCRIPT_VERSION};
use crate::transcript::round::{RoundType, RoundV1};

/// Error building a transcript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Canon(#[from] CanonError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// Round timestamps must be non-decreasing.
    #[error("round {round_number}: timestamp {current} is earlier than predecessor's {previous}")]
    TimestampRegression {
        round_number: u64,
        previous: u64,
        current: u64,
    },
    /// A transcript needs at least one round.
    #[error("transcript has no rounds")]
    NoRounds,
}

/// One round's caller-supplied content, before hashing and signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDraft {
    pub round_type: RoundType,
    pub agent_id: String,
    pub timestamp_ms: u64,
    pub message: Value,
    pub content_summary: Value,
}

impl RoundDraft {
    /// A draft whose summary defaults to an empty object.
    #[must_use]
    pub fn new(round_type: RoundType, agent_id: &str, timestamp_ms: u64, message: Value) -> Self {
        Self {
            round_type,
            agent_id: agent_id.to_string(),
            timestamp_ms,
            message,
            content_summary: Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: Value) -> Self {
        self.content_summary = summary;
        self
    }
}

/// Incremental transcript producer.
#[derive(Debug, Clone)]
pub struct TranscriptBuilder {
    transcript: TranscriptV1,
    include_messages: bool,
}

impl TranscriptBuilder {
    #[must_use]
    pub fn new(transcript_id: &str, intent_id: &str, created_at_ms: u64) -> Self {
        Self {
            transcript: TranscriptV1 {
                version: TRANSCRIPT_VERSION.to_string(),
                transcript_id: transcript_id.to_string(),
                intent_id: intent_id.to_string(),
                created_at_ms,
                rounds: Vec::new(),
                receipt: None,
                failure_event: None,
                final_hash: None,
            },
            include_messages: true,
        }
    }

    /// Ship envelope hashes only; message bodies stay with the producer.
    #[must_use]
    pub fn without_messages(mut self) -> Self {
        self.include_messages = false;
        self
    }

    /// Hash, sign and link the next round.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the message or summary is not canonically
    /// encodable, or the timestamp goes backwards.
    pub fn push(&mut self, draft: RoundDraft, key: &SigningKey) -> Result<&RoundV1, BuildError> {
        let round_number = self.transcript.rounds.len() as u64;
        let previous_round_hash = match self.transcript.rounds.last() {
            Some(prev) => {
                if draft.timestamp_ms < prev.timestamp_ms {
                    return Err(BuildError::TimestampRegression {
                        round_number,
                        previous: prev.timestamp_ms,
                        current: draft.timestamp_ms,
                    });
                }
                prev.round_hash.clone()
            }
            None => chain_seed(&self.transcript.intent_id, self.transcript.created_at_ms),
        };

        let envelope = envelope_hash(&draft.message)?;
        let signature_b58 = sign_envelope_hash(&envelope, key)?;

        let mut round = RoundV1 {
            round_number,
            round_type: draft.round_type,
            agent_id: draft.agent_id,
            public_key_b58: public_key_b58(key),
            timestamp_ms: draft.timestamp_ms,
            envelope_hash: envelope,
            // A JSON `null` body would read back as an absent message and
            // drop out of the round-hash pre-image, so it is never shipped.
            message: (self.include_messages && !draft.message.is_null())
                .then_some(draft.message),
            previous_round_hash,
            signature_b58,
            content_summary: draft.content_summary,
            round_hash: String::new(),
            extensions: serde_json::Map::new(),
        };
        round.round_hash = compute_round_hash(&round)?;

        tracing::trace!(
            transcript_id = %self.transcript.transcript_id,
            round = round_number,
            round_type = %round.round_type,
            "round appended"
        );
        self.transcript.rounds.push(round);
        Ok(&self.transcript.rounds[self.transcript.rounds.len() - 1])
    }

    pub fn set_receipt(&mut self, receipt: Receipt) -> &mut Self {
        self.transcript.receipt = Some(receipt);
        self
    }

    pub fn set_failure_event(&mut self, event: FailureEvent) -> &mut Self {
        self.transcript.failure_event = Some(event);
        self
    }

    /// Seal the terminal outcome and return the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoRounds`] for an empty transcript, or a
    /// canonicalization error from the seal.
    pub fn finish(mut self) -> Result<TranscriptV1, BuildError> {
        if self.transcript.rounds.is_empty() {
            return Err(BuildError::NoRounds);
        }
        self.transcript.final_hash = Some(compute_final_hash(&self.transcript)?);
        Ok(self.transcript)
    }

    /// Return the transcript without a terminal seal (legacy producers).
    #[must_use]
    pub fn finish_unsealed(self) -> TranscriptV1 {
        self.transcript
    }
}
