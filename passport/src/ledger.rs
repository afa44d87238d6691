//! `PassportLedger`: append-only reputation logs keyed by signer key.
//!
//! Each identity owns a log of [`HistoryRow`]s. Score and tier are never
//! stored; they are folded from the log on read. `ingest` runs its
//! check-and-append inside the map's entry guard, so concurrent ingests for
//! the same identity serialize while different identities proceed
//! independently.

use std::collections::HashSet;

use dashmap::DashMap;

use pact_dbl::judgment::{Determination, Judgment};
use pact_kernel::codec::canon::{canonical_json_bytes, CanonError};
use pact_kernel::proof::verdict::IntegrityStatus;

use crate::config::LedgerConfig;
use crate::entry::{HistoryRow, PassportEntry};
use crate::error::LedgerError;

#[derive(Debug, Default)]
struct IdentityLog {
    rows: Vec<HistoryRow>,
    transcripts: HashSet<String>,
}

/// The reputation ledger.
#[derive(Debug, Default)]
pub struct PassportLedger {
    config: LedgerConfig,
    logs: DashMap<String, IdentityLog>,
}

impl PassportLedger {
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            config,
            logs: DashMap::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Record `judgment` against `signer_key_b58`.
    ///
    /// Appends exactly one row on success and returns the updated entry.
    ///
    /// The digest check catches a judgment edited after resolution without
    /// re-sealing. It does not authenticate the producer: the digest is an
    /// unkeyed hash, so anyone holding a judgment can edit and re-seal it.
    /// Callers that accept judgments from other parties must adjudicate the
    /// transcript themselves rather than trust the judgment.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] (and changes nothing) if the judgment fails
    /// its digest, comes from an unverified transcript, has no transcript
    /// id, does not name the signer as a party, or was already recorded for
    /// this signer.
    pub fn ingest(
        &self,
        judgment: &Judgment,
        signer_key_b58: &str,
    ) -> Result<PassportEntry, LedgerError> {
        if let Err(e) = check_judgment(judgment, signer_key_b58) {
            return Err(reject(e, signer_key_b58));
        }

        let row = HistoryRow {
            transcript_id: judgment.transcript_id().to_string(),
            delta: judgment.impact_for(signer_key_b58),
            constitution_hash: judgment.constitution_hash().to_string(),
            timestamp_ms: judgment.decided_at_ms(),
            determination: judgment.determination(),
            judgment_digest: judgment.judgment_digest().to_string(),
        };

        let mut log = self.logs.entry(signer_key_b58.to_string()).or_default();
        if !log.transcripts.insert(row.transcript_id.clone()) {
            let e = LedgerError::AlreadyIngested {
                signer: signer_key_b58.to_string(),
                transcript_id: row.transcript_id,
            };
            return Err(reject(e, signer_key_b58));
        }
        log.rows.push(row);
        let entry = PassportEntry::from_history(signer_key_b58, &log.rows, &self.config);
        drop(log);

        tracing::info!(
            signer = %signer_key_b58,
            transcript_id = %judgment.transcript_id(),
            determination = %judgment.determination(),
            delta = judgment.impact_for(signer_key_b58),
            score = entry.score,
            "history row appended"
        );
        Ok(entry)
    }

    /// Current entry for a signer.
    #[must_use]
    pub fn entry(&self, signer_key_b58: &str) -> Option<PassportEntry> {
        self.logs
            .get(signer_key_b58)
            .map(|log| PassportEntry::from_history(signer_key_b58, &log.rows, &self.config))
    }

    /// History rows for a signer, in append order.
    #[must_use]
    pub fn history(&self, signer_key_b58: &str) -> Vec<HistoryRow> {
        self.logs
            .get(signer_key_b58)
            .map(|log| log.rows.clone())
            .unwrap_or_default()
    }

    /// Known signers, sorted.
    #[must_use]
    pub fn signers(&self) -> Vec<String> {
        let mut signers: Vec<String> = self.logs.iter().map(|e| e.key().clone()).collect();
        signers.sort();
        signers
    }

    /// Recompute a signer's entry under a different config. History is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfig`] if `config` does not validate.
    pub fn rescore(
        &self,
        signer_key_b58: &str,
        config: &LedgerConfig,
    ) -> Result<Option<PassportEntry>, LedgerError> {
        config.validate()?;
        Ok(self
            .logs
            .get(signer_key_b58)
            .map(|log| PassportEntry::from_history(signer_key_b58, &log.rows, config)))
    }

    /// Every row as a canonical JSON line, sorted by signer then append
    /// order. Each line carries the signer and the row's hash.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if a row cannot be canonicalized.
    pub fn export_rows(&self) -> Result<Vec<String>, CanonError> {
        let mut lines = Vec::new();
        for signer in self.signers() {
            for row in self.history(&signer) {
                let mut value =
                    serde_json::to_value(&row).map_err(|e| CanonError::NotRepresentable {
                        detail: e.to_string(),
                    })?;
                let row_hash = row.row_hash()?;
                if let serde_json::Value::Object(map) = &mut value {
                    map.insert("signer".into(), signer.clone().into());
                    map.insert("row_hash".into(), row_hash.as_str().into());
                }
                let bytes = canonical_json_bytes(&value)?;
                lines.push(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        Ok(lines)
    }

    /// Number of identities with at least one row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Total rows across all identities.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.logs.iter().map(|log| log.rows.len()).sum()
    }
}

fn check_judgment(judgment: &Judgment, signer: &str) -> Result<(), LedgerError> {
    let transcript_id = judgment.transcript_id();
    if !judgment.digest_matches() {
        return Err(LedgerError::DigestMismatch {
            transcript_id: transcript_id.to_string(),
        });
    }
    let integrity = judgment.integrity_status();
    let determination = judgment.determination();
    let verified = match (integrity, determination) {
        (IntegrityStatus::Valid, Determination::IndeterminateTamper) => false,
        (IntegrityStatus::Valid, _) => true,
        (_, Determination::IndeterminateTamper) => judgment.passport_impact() == 0,
        _ => false,
    };
    if !verified {
        return Err(LedgerError::UnverifiedSource {
            transcript_id: transcript_id.to_string(),
            integrity,
            determination,
        });
    }
    if transcript_id.is_empty() {
        return Err(LedgerError::EmptyTranscriptId);
    }
    if !judgment.is_party(signer) {
        return Err(LedgerError::NotAParty {
            signer: signer.to_string(),
            transcript_id: transcript_id.to_string(),
        });
    }
    Ok(())
}

fn reject(e: LedgerError, signer: &str) -> LedgerError {
    if e.is_contract_violation() {
        tracing::warn!(signer = %signer, error = %e, "contract violation on ingest");
    } else {
        tracing::warn!(signer = %signer, error = %e, "ingest rejected");
    }
    e
}
