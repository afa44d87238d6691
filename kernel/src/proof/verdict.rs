//! Verification verdict types: integrity status, error kinds, result record.

use serde::{Deserialize, Serialize};

/// Overall integrity verdict of a transcript.
///
/// Mutually exclusive. When several findings accumulate the most severe one
/// wins: `TAMPERED > INVALID > INDETERMINATE > VALID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    Valid,
    Indeterminate,
    Invalid,
    Tampered,
}

impl IntegrityStatus {
    /// Rank used for precedence (higher is worse).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Valid => 0,
            Self::Indeterminate => 1,
            Self::Invalid => 2,
            Self::Tampered => 3,
        }
    }

    /// The more severe of two statuses.
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Indeterminate => "INDETERMINATE",
            Self::Invalid => "INVALID",
            Self::Tampered => "TAMPERED",
        }
    }
}

impl std::fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a single verification finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationErrorKind {
    // Structural
    MalformedTranscript,
    EmptyTranscript,
    MissingField,
    RoundNumberGap,
    NonCanonicalRound,
    // Integrity
    ChainBreak,
    RoundHashMismatch,
    EnvelopeHashMismatch,
    FinalHashMismatch,
    SignatureInvalid,
    SignerMismatch,
    TimestampRegression,
    // Insufficient information
    KeyUnresolvable,
}

impl VerificationErrorKind {
    /// The status this finding forces, before precedence is applied.
    #[must_use]
    pub const fn status_impact(self) -> IntegrityStatus {
        match self {
            Self::ChainBreak
            | Self::RoundHashMismatch
            | Self::EnvelopeHashMismatch
            | Self::FinalHashMismatch => IntegrityStatus::Tampered,
            Self::MalformedTranscript
            | Self::EmptyTranscript
            | Self::MissingField
            | Self::RoundNumberGap
            | Self::NonCanonicalRound
            | Self::SignatureInvalid
            | Self::SignerMismatch
            | Self::TimestampRegression => IntegrityStatus::Invalid,
            Self::KeyUnresolvable => IntegrityStatus::Indeterminate,
        }
    }

    /// Whether this finding aborts verification before the per-round passes.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::MalformedTranscript
                | Self::EmptyTranscript
                | Self::MissingField
                | Self::RoundNumberGap
                | Self::NonCanonicalRound
        )
    }
}

/// One verification finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationError {
    pub kind: VerificationErrorKind,
    /// Round the finding is attributed to; `None` for transcript-level findings.
    pub round_number: Option<u64>,
    pub detail: String,
}

impl VerificationError {
    pub(crate) fn at_round(kind: VerificationErrorKind, round_number: u64, detail: String) -> Self {
        Self {
            kind,
            round_number: Some(round_number),
            detail,
        }
    }

    pub(crate) fn transcript(kind: VerificationErrorKind, detail: String) -> Self {
        Self {
            kind,
            round_number: None,
            detail,
        }
    }
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.round_number {
            Some(n) => write!(f, "round {n}: {:?}: {}", self.kind, self.detail),
            None => write!(f, "{:?}: {}", self.kind, self.detail),
        }
    }
}

/// Outcome of replay verification. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub integrity_status: IntegrityStatus,
    pub rounds_total: u64,
    pub signatures_verified: u64,
    pub chain_links_verified: u64,
    pub round_hashes_verified: u64,
    /// Leading rounds that passed every per-round check.
    pub verified_prefix: u64,
    /// Every finding, in discovery order.
    pub errors: Vec<VerificationError>,
}

impl VerificationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.integrity_status == IntegrityStatus::Valid
    }

    /// Round numbers named by findings, deduplicated, ascending.
    #[must_use]
    pub fn implicated_rounds(&self) -> Vec<u64> {
        let mut rounds: Vec<u64> = self.errors.iter().filter_map(|e| e.round_number).collect();
        rounds.sort_unstable();
        rounds.dedup();
        rounds
    }

    /// Whether any finding has the given kind.
    #[must_use]
    pub fn has_error(&self, kind: VerificationErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}
