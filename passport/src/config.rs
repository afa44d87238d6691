//! Ledger scoring configuration.
//!
//! Score bounds, the starting score, and the tier thresholds. The policy
//! hash commits a ledger export to the configuration that scored it.

use serde::{Deserialize, Serialize};

use pact_kernel::codec::canon::{canonical_bytes_of, CanonError};
use pact_kernel::codec::hash::{canonical_hash, ContentHash, HashDomain};

/// Minimum score for each tier above `RESTRICTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub probation: i64,
    pub standard: i64,
    pub established: i64,
    pub trusted: i64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            probation: 300,
            standard: 450,
            established: 600,
            trusted: 800,
        }
    }
}

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub min_score: i64,
    pub max_score: i64,
    pub initial_score: i64,
    pub tiers: TierThresholds,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_score: 0,
            max_score: 1000,
            initial_score: 500,
            tiers: TierThresholds::default(),
        }
    }
}

/// Error validating a [`LedgerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerConfigError {
    #[error("score bounds inverted: min {min} > max {max}")]
    InvertedBounds { min: i64, max: i64 },
    #[error("initial score {initial} outside [{min}, {max}]")]
    InitialOutOfBounds { initial: i64, min: i64, max: i64 },
    #[error("tier thresholds must be strictly increasing within the score bounds")]
    ThresholdOrder,
}

impl LedgerConfig {
    /// # Errors
    ///
    /// Returns [`LedgerConfigError`] if the bounds are inverted, the initial
    /// score falls outside them, or the tier thresholds are not strictly
    /// increasing inside `(min_score, max_score]`.
    pub fn validate(&self) -> Result<(), LedgerConfigError> {
        if self.min_score > self.max_score {
            return Err(LedgerConfigError::InvertedBounds {
                min: self.min_score,
                max: self.max_score,
            });
        }
        if !(self.min_score..=self.max_score).contains(&self.initial_score) {
            return Err(LedgerConfigError::InitialOutOfBounds {
                initial: self.initial_score,
                min: self.min_score,
                max: self.max_score,
            });
        }
        let t = &self.tiers;
        let ladder = [self.min_score, t.probation, t.standard, t.established, t.trusted];
        let increasing = ladder.windows(2).all(|w| w[0] < w[1]);
        if !increasing || t.trusted > self.max_score {
            return Err(LedgerConfigError::ThresholdOrder);
        }
        Ok(())
    }

    /// Domain-separated hash of the canonical config.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn policy_hash(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_bytes_of(self)?;
        Ok(canonical_hash(HashDomain::LedgerPolicy, &bytes))
    }

    /// Clamp a score into bounds.
    #[must_use]
    pub fn clamp(&self, score: i64) -> i64 {
        score.clamp(self.min_score, self.max_score)
    }
}
