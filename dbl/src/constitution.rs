//! Constitution: the committed rule set the resolver judges under.
//!
//! Every number the resolver uses (score deltas, confidence levels,
//! recommendation thresholds, the early-stop rule) lives in
//! [`ConstitutionRules`]. [`build_constitution`] applies a
//! [`ConstitutionConfig`] of optional overrides over the v1 defaults,
//! validates the result, and renders a canonical JSON snapshot. The
//! domain-separated hash of that snapshot is the constitution hash stamped
//! on every judgment, so a judgment names exactly the rules that produced it.

use serde::{Deserialize, Serialize};

use pact_kernel::codec::canon::{canonical_bytes_of, CanonError};
use pact_kernel::codec::hash::{canonical_hash, ContentHash, HashDomain};

/// Schema tag embedded in every snapshot.
pub const CONSTITUTION_VERSION: &str = "constitution/1";

/// Fixed-point scale for confidence: 10000 bps = 1.0.
pub const CONFIDENCE_SCALE_BPS: u32 = 10_000;

/// How a transcript that stopped with neither receipt nor failure event is
/// attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EarlyStopRule {
    /// Voluntary early stop is nobody's fault.
    NoFault,
    /// The intent initiator walked away; the buyer carries it.
    BuyerAtFault,
}

/// Confidence per terminal-ambiguity class, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceLevels {
    /// Terminal outcome sealed by `final_hash` or corroborated by a signed round.
    pub sealed: u32,
    /// Terminal outcome present but neither sealed nor corroborated.
    pub claimed: u32,
    /// No terminal outcome at all.
    pub open: u32,
    /// Receipt present but not fulfilled.
    pub unfulfilled: u32,
    /// Failure that cannot be attributed to either party.
    pub unattributable: u32,
    /// Receipt and failure event both present.
    pub conflicting: u32,
}

impl Default for ConfidenceLevels {
    fn default() -> Self {
        Self {
            sealed: 10_000,
            claimed: 8_000,
            open: 9_000,
            unfulfilled: 7_000,
            unattributable: 5_000,
            conflicting: 4_000,
        }
    }
}

impl ConfidenceLevels {
    fn as_pairs(&self) -> [(&'static str, u32); 6] {
        [
            ("sealed", self.sealed),
            ("claimed", self.claimed),
            ("open", self.open),
            ("unfulfilled", self.unfulfilled),
            ("unattributable", self.unattributable),
            ("conflicting", self.conflicting),
        ]
    }
}

/// The full rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstitutionRules {
    /// Reward to both parties for a fulfilled transaction.
    pub completion_delta: i64,
    /// Penalty for a provider-side failure.
    pub provider_fault_delta: i64,
    /// Penalty for a buyer-side failure.
    pub buyer_fault_delta: i64,
    /// Penalty for a settled but unfulfilled receipt.
    pub unfulfilled_delta: i64,
    pub confidence: ConfidenceLevels,
    /// Below this, the recommendation is `RERUN`.
    pub rerun_threshold_bps: u32,
    /// At or above this, a provider fault recommends `AVOID`.
    pub avoid_threshold_bps: u32,
    /// At or above this, a buyer fault recommends `BLOCK`.
    pub block_threshold_bps: u32,
    pub early_stop: EarlyStopRule,
}

impl Default for ConstitutionRules {
    fn default() -> Self {
        Self {
            completion_delta: 10,
            provider_fault_delta: -20,
            buyer_fault_delta: -10,
            unfulfilled_delta: -15,
            confidence: ConfidenceLevels::default(),
            rerun_threshold_bps: 6_000,
            avoid_threshold_bps: 8_000,
            block_threshold_bps: 8_000,
            early_stop: EarlyStopRule::NoFault,
        }
    }
}

/// Optional overrides over [`ConstitutionRules::default`].
///
/// `None` keeps the v1 default for that rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstitutionConfig {
    pub completion_delta: Option<i64>,
    pub provider_fault_delta: Option<i64>,
    pub buyer_fault_delta: Option<i64>,
    pub unfulfilled_delta: Option<i64>,
    pub confidence: Option<ConfidenceLevels>,
    pub rerun_threshold_bps: Option<u32>,
    pub avoid_threshold_bps: Option<u32>,
    pub block_threshold_bps: Option<u32>,
    pub early_stop: Option<EarlyStopRule>,
}

impl ConstitutionConfig {
    /// Resolve overrides against the defaults.
    #[must_use]
    pub fn rules(&self) -> ConstitutionRules {
        let d = ConstitutionRules::default();
        ConstitutionRules {
            completion_delta: self.completion_delta.unwrap_or(d.completion_delta),
            provider_fault_delta: self.provider_fault_delta.unwrap_or(d.provider_fault_delta),
            buyer_fault_delta: self.buyer_fault_delta.unwrap_or(d.buyer_fault_delta),
            unfulfilled_delta: self.unfulfilled_delta.unwrap_or(d.unfulfilled_delta),
            confidence: self.confidence.unwrap_or(d.confidence),
            rerun_threshold_bps: self.rerun_threshold_bps.unwrap_or(d.rerun_threshold_bps),
            avoid_threshold_bps: self.avoid_threshold_bps.unwrap_or(d.avoid_threshold_bps),
            block_threshold_bps: self.block_threshold_bps.unwrap_or(d.block_threshold_bps),
            early_stop: self.early_stop.unwrap_or(d.early_stop),
        }
    }
}

/// Error building a constitution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstitutionBuildError {
    /// A rule is out of range.
    #[error("invalid rule {rule}: {detail}")]
    InvalidRule { rule: &'static str, detail: String },
    /// Canonical JSON serialization failed.
    #[error(transparent)]
    Canon(#[from] CanonError),
}

/// A validated rule set with its snapshot and hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constitution {
    rules: ConstitutionRules,
    snapshot: Vec<u8>,
    hash: ContentHash,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    schema_version: &'static str,
    rules: &'a ConstitutionRules,
}

impl Constitution {
    /// The v1 default constitution.
    #[must_use]
    pub fn v1() -> Self {
        let rules = ConstitutionRules::default();
        // Integer-only snapshot; canonicalization cannot fail.
        let snapshot = render_snapshot(&rules).unwrap_or_default();
        Self::from_parts(rules, snapshot)
    }

    fn from_parts(rules: ConstitutionRules, snapshot: Vec<u8>) -> Self {
        let hash = canonical_hash(HashDomain::ConstitutionSnapshot, &snapshot);
        Self {
            rules,
            snapshot,
            hash,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &ConstitutionRules {
        &self.rules
    }

    /// Canonical JSON bytes of the snapshot.
    #[must_use]
    pub fn snapshot_bytes(&self) -> &[u8] {
        &self.snapshot
    }

    /// The constitution hash (`"sha256:<hex>"`).
    #[must_use]
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }
}

impl Default for Constitution {
    fn default() -> Self {
        Self::v1()
    }
}

/// Build a [`Constitution`] from optional overrides.
///
/// # Errors
///
/// Returns [`ConstitutionBuildError::InvalidRule`] when a confidence level
/// or threshold exceeds [`CONFIDENCE_SCALE_BPS`], the completion reward is
/// negative, or a penalty is positive.
pub fn build_constitution(
    config: &ConstitutionConfig,
) -> Result<Constitution, ConstitutionBuildError> {
    let rules = config.rules();
    validate(&rules)?;
    let snapshot = render_snapshot(&rules)?;
    let constitution = Constitution::from_parts(rules, snapshot);
    tracing::debug!(hash = %constitution.hash, "constitution built");
    Ok(constitution)
}

fn render_snapshot(rules: &ConstitutionRules) -> Result<Vec<u8>, CanonError> {
    canonical_bytes_of(&Snapshot {
        schema_version: CONSTITUTION_VERSION,
        rules,
    })
}

fn validate(rules: &ConstitutionRules) -> Result<(), ConstitutionBuildError> {
    let bps_rules = rules.confidence.as_pairs().into_iter().chain([
        ("rerun_threshold_bps", rules.rerun_threshold_bps),
        ("avoid_threshold_bps", rules.avoid_threshold_bps),
        ("block_threshold_bps", rules.block_threshold_bps),
    ]);
    for (rule, value) in bps_rules {
        if value > CONFIDENCE_SCALE_BPS {
            return Err(ConstitutionBuildError::InvalidRule {
                rule,
                detail: format!("{value} exceeds {CONFIDENCE_SCALE_BPS}"),
            });
        }
    }
    if rules.completion_delta < 0 {
        return Err(ConstitutionBuildError::InvalidRule {
            rule: "completion_delta",
            detail: format!("reward {} is negative", rules.completion_delta),
        });
    }
    for (rule, value) in [
        ("provider_fault_delta", rules.provider_fault_delta),
        ("buyer_fault_delta", rules.buyer_fault_delta),
        ("unfulfilled_delta", rules.unfulfilled_delta),
    ] {
        if value > 0 {
            return Err(ConstitutionBuildError::InvalidRule {
                rule,
                detail: format!("penalty {value} is positive"),
            });
        }
    }
    Ok(())
}
