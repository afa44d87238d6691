//! Ledger rejection reasons.

use pact_dbl::judgment::Determination;
use pact_kernel::proof::verdict::IntegrityStatus;

use crate::config::LedgerConfigError;

/// Why an ingest was rejected. A rejected ingest changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The judgment does not re-hash to its `judgment_digest`.
    #[error("judgment for {transcript_id:?} does not match its digest")]
    DigestMismatch { transcript_id: String },
    /// The judgment did not come from a verified transcript.
    #[error("judgment for {transcript_id:?} has unverified source ({integrity}, {determination})")]
    UnverifiedSource {
        transcript_id: String,
        integrity: IntegrityStatus,
        determination: Determination,
    },
    #[error("judgment has an empty transcript id")]
    EmptyTranscriptId,
    #[error("signer {signer} is not a party to {transcript_id:?}")]
    NotAParty {
        signer: String,
        transcript_id: String,
    },
    /// Idempotent replay of an already recorded judgment.
    #[error("transcript {transcript_id:?} already ingested for {signer}")]
    AlreadyIngested {
        signer: String,
        transcript_id: String,
    },
    #[error(transparent)]
    InvalidConfig(#[from] LedgerConfigError),
}

impl LedgerError {
    /// Errors that mean the caller broke the ingest contract rather than
    /// hit an ordinary rejection.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::DigestMismatch { .. } | Self::UnverifiedSource { .. })
    }
}
