//! Reputation entries and their append-only history rows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pact_dbl::judgment::Determination;
use pact_kernel::codec::canon::{canonical_bytes_of, CanonError};
use pact_kernel::codec::hash::{canonical_hash, ContentHash, HashDomain};

use crate::config::LedgerConfig;

/// Standing derived from score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Restricted,
    Probation,
    Standard,
    Established,
    Trusted,
}

impl Tier {
    #[must_use]
    pub fn for_score(score: i64, config: &LedgerConfig) -> Self {
        let t = &config.tiers;
        if score >= t.trusted {
            Self::Trusted
        } else if score >= t.established {
            Self::Established
        } else if score >= t.standard {
            Self::Standard
        } else if score >= t.probation {
            Self::Probation
        } else {
            Self::Restricted
        }
    }
}

/// One ingested judgment, as seen by one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub transcript_id: String,
    pub delta: i64,
    pub constitution_hash: String,
    pub timestamp_ms: u64,
    pub determination: Determination,
    pub judgment_digest: String,
}

impl HistoryRow {
    /// Domain-separated hash of the row's canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn row_hash(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(HashDomain::HistoryRow, &canonical_bytes_of(self)?))
    }
}

/// Read-only view of one identity's reputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportEntry {
    pub signer: String,
    pub score: i64,
    pub tier: Tier,
    pub history: Vec<HistoryRow>,
    /// Every constitution hash a judgment in `history` was decided under.
    pub constitution_hashes: BTreeSet<String>,
}

impl PassportEntry {
    /// Derive the entry from its history under `config`.
    #[must_use]
    pub fn from_history(signer: &str, history: &[HistoryRow], config: &LedgerConfig) -> Self {
        let score = score_of(history, config);
        Self {
            signer: signer.to_string(),
            score,
            tier: Tier::for_score(score, config),
            history: history.to_vec(),
            constitution_hashes: history
                .iter()
                .map(|row| row.constitution_hash.clone())
                .collect(),
        }
    }
}

/// Fold the history from the initial score, clamping at every step.
#[must_use]
pub fn score_of(history: &[HistoryRow], config: &LedgerConfig) -> i64 {
    history.iter().fold(config.initial_score, |score, row| {
        config.clamp(score.saturating_add(row.delta))
    })
}
