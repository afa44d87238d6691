//! Verify-then-resolve in one call.

use pact_kernel::proof::replay::{replay_verify, replay_verify_bytes};
use pact_kernel::proof::verdict::VerificationResult;
use pact_kernel::transcript::model::TranscriptV1;

use crate::constitution::Constitution;
use crate::judgment::Judgment;
use crate::resolve::{resolve_unparsed, resolve_with};

/// A verification result and the judgment resolved from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjudication {
    pub verification: VerificationResult,
    pub judgment: Judgment,
}

/// Verify `transcript` and resolve it under `constitution`.
#[must_use]
pub fn adjudicate(transcript: &TranscriptV1, constitution: &Constitution) -> Adjudication {
    let verification = replay_verify(transcript);
    let judgment = resolve_with(transcript, &verification, constitution);
    Adjudication {
        verification,
        judgment,
    }
}

/// [`adjudicate`] over raw JSON bytes. Unparsable input yields an
/// `INDETERMINATE_TAMPER` judgment with an empty transcript id.
#[must_use]
pub fn adjudicate_bytes(bytes: &[u8], constitution: &Constitution) -> Adjudication {
    let parsed = replay_verify_bytes(bytes);
    let judgment = match &parsed.transcript {
        Some(transcript) => resolve_with(transcript, &parsed.verification, constitution),
        None => resolve_unparsed(&parsed.verification, constitution),
    };
    Adjudication {
        verification: parsed.verification,
        judgment,
    }
}
