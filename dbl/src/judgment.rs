//! `Judgment`: the resolver's immutable verdict record.
//!
//! Fields are private and exposed through accessors. The `judgment_digest`
//! is `sha256(JUDGMENT_DIGEST domain || canonical(judgment minus digest))`;
//! any change to any other field after resolution breaks it. The digest is
//! unkeyed: it detects edits that were not re-sealed, not who sealed them.

use serde::{Deserialize, Serialize};

use pact_kernel::codec::canon::{canonical_bytes_of, CanonError};
use pact_kernel::codec::hash::{canonical_hash, HashDomain};
use pact_kernel::proof::verdict::IntegrityStatus;
use pact_kernel::transcript::model::FailureCode;

/// Judgment schema tag.
pub const JUDGMENT_VERSION: &str = "dbl/1";

const DIGEST_FIELD: &str = "judgment_digest";

/// What happened, as an outcome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Completed,
    AbortedPolicy,
    FailedProviderUnreachable,
    FailedProviderTimeout,
    FailedProof,
    FailedNegotiationDeadlock,
    FailedSettlement,
    FailedUnfulfilled,
    ConflictingTerminal,
    EndedWithoutSettlement,
    FailedIntegrity,
}

impl From<FailureCode> for OutcomeStatus {
    fn from(code: FailureCode) -> Self {
        match code {
            FailureCode::AbortedPolicy => Self::AbortedPolicy,
            FailureCode::FailedProviderUnreachable => Self::FailedProviderUnreachable,
            FailureCode::FailedProviderTimeout => Self::FailedProviderTimeout,
            FailureCode::FailedProof => Self::FailedProof,
            FailureCode::FailedNegotiationDeadlock => Self::FailedNegotiationDeadlock,
            FailureCode::FailedSettlement => Self::FailedSettlement,
        }
    }
}

/// Fault domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Determination {
    NoFault,
    BuyerAtFault,
    ProviderAtFault,
    Indeterminate,
    /// The record itself cannot be trusted.
    IndeterminateTamper,
}

impl Determination {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoFault => "NO_FAULT",
            Self::BuyerAtFault => "BUYER_AT_FAULT",
            Self::ProviderAtFault => "PROVIDER_AT_FAULT",
            Self::Indeterminate => "INDETERMINATE",
            Self::IndeterminateTamper => "INDETERMINATE_TAMPER",
        }
    }
}

impl std::fmt::Display for Determination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who `passport_impact` applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactSubject {
    None,
    Buyer,
    Provider,
    Both,
}

/// Suggested downstream action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Informational,
    Rerun,
    Escalate,
    Block,
    Avoid,
}

/// Resolver verdict for one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub(crate) version: String,
    pub(crate) transcript_id: String,
    pub(crate) intent_id: String,
    pub(crate) integrity_status: IntegrityStatus,
    pub(crate) status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) failure_code: Option<FailureCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_valid_round: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_valid_summary: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_valid_hash: Option<String>,
    pub(crate) determination: Determination,
    pub(crate) confidence_bps: u32,
    pub(crate) passport_impact: i64,
    pub(crate) impact_subject: ImpactSubject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) buyer_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) provider_public_key: Option<String>,
    pub(crate) recommendation: Recommendation,
    pub(crate) decided_at_ms: u64,
    pub(crate) constitution_hash: String,
    pub(crate) judgment_digest: String,
}

impl Judgment {
    /// Fill in `judgment_digest`. An unencodable judgment keeps an empty
    /// digest, which no consumer accepts.
    pub(crate) fn sealed(mut self) -> Self {
        self.judgment_digest.clear();
        self.judgment_digest = self.compute_digest().unwrap_or_default();
        self
    }

    /// Recompute the digest over every field except `judgment_digest`.
    pub(crate) fn compute_digest(&self) -> Result<String, CanonError> {
        let mut value = serde_json::to_value(self).map_err(|e| CanonError::NotRepresentable {
            detail: e.to_string(),
        })?;
        if let serde_json::Value::Object(map) = &mut value {
            map.remove(DIGEST_FIELD);
        }
        let bytes = canonical_bytes_of(&value)?;
        Ok(canonical_hash(HashDomain::JudgmentDigest, &bytes)
            .as_str()
            .to_string())
    }

    /// Whether the carried digest matches the content.
    #[must_use]
    pub fn digest_matches(&self) -> bool {
        !self.judgment_digest.is_empty()
            && matches!(self.compute_digest(), Ok(d) if d == self.judgment_digest)
    }

    /// Canonical JSON of the full judgment, for evidence packagers.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if the judgment is not canonically encodable.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_bytes_of(self)
    }

    /// Parse a judgment from JSON bytes. The digest is not checked here.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error on malformed input.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    #[must_use]
    pub fn intent_id(&self) -> &str {
        &self.intent_id
    }

    #[must_use]
    pub fn integrity_status(&self) -> IntegrityStatus {
        self.integrity_status
    }

    #[must_use]
    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    #[must_use]
    pub fn failure_code(&self) -> Option<FailureCode> {
        self.failure_code
    }

    #[must_use]
    pub fn last_valid_round(&self) -> Option<u64> {
        self.last_valid_round
    }

    #[must_use]
    pub fn last_valid_summary(&self) -> Option<&serde_json::Value> {
        self.last_valid_summary.as_ref()
    }

    #[must_use]
    pub fn last_valid_hash(&self) -> Option<&str> {
        self.last_valid_hash.as_deref()
    }

    #[must_use]
    pub fn determination(&self) -> Determination {
        self.determination
    }

    /// Confidence in basis points (10000 = 1.0).
    #[must_use]
    pub fn confidence_bps(&self) -> u32 {
        self.confidence_bps
    }

    /// Confidence as a fraction in `[0, 1]`. Display only.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        f64::from(self.confidence_bps) / 10_000.0
    }

    #[must_use]
    pub fn passport_impact(&self) -> i64 {
        self.passport_impact
    }

    #[must_use]
    pub fn impact_subject(&self) -> ImpactSubject {
        self.impact_subject
    }

    #[must_use]
    pub fn buyer_public_key(&self) -> Option<&str> {
        self.buyer_public_key.as_deref()
    }

    #[must_use]
    pub fn provider_public_key(&self) -> Option<&str> {
        self.provider_public_key.as_deref()
    }

    #[must_use]
    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    #[must_use]
    pub fn decided_at_ms(&self) -> u64 {
        self.decided_at_ms
    }

    #[must_use]
    pub fn constitution_hash(&self) -> &str {
        &self.constitution_hash
    }

    #[must_use]
    pub fn judgment_digest(&self) -> &str {
        &self.judgment_digest
    }

    /// Score delta this judgment assigns to `public_key_b58`: the impact if
    /// the key is within the impact subject, otherwise 0.
    #[must_use]
    pub fn impact_for(&self, public_key_b58: &str) -> i64 {
        let is_buyer = self.buyer_public_key.as_deref() == Some(public_key_b58);
        let is_provider = self.provider_public_key.as_deref() == Some(public_key_b58);
        let applies = match self.impact_subject {
            ImpactSubject::None => false,
            ImpactSubject::Buyer => is_buyer,
            ImpactSubject::Provider => is_provider,
            ImpactSubject::Both => is_buyer || is_provider,
        };
        if applies {
            self.passport_impact
        } else {
            0
        }
    }

    /// Whether `public_key_b58` is the buyer or the provider.
    #[must_use]
    pub fn is_party(&self, public_key_b58: &str) -> bool {
        self.buyer_public_key.as_deref() == Some(public_key_b58)
            || self.provider_public_key.as_deref() == Some(public_key_b58)
    }
}
