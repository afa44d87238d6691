//! `resolve()`: map a verified transcript to a [`Judgment`].
//!
//! Pure and total. No I/O, no randomness, no wall clock: `decided_at_ms`
//! comes from the transcript. Branching is one exhaustive `match` over the
//! integrity status and the [`TerminalShape`].

use pact_kernel::proof::verdict::{IntegrityStatus, VerificationResult};
use pact_kernel::transcript::model::{FailureCode, FailureEvent, TranscriptV1};
use pact_kernel::transcript::round::RoundV1;

use crate::constitution::{Constitution, ConstitutionRules, EarlyStopRule, CONFIDENCE_SCALE_BPS};
use crate::judgment::{
    Determination, ImpactSubject, Judgment, OutcomeStatus, Recommendation, JUDGMENT_VERSION,
};
use crate::terminal::{attribute_abort, Attribution, Parties, Party, TerminalShape};

/// Resolve under the v1 constitution.
#[must_use]
pub fn resolve(transcript: &TranscriptV1, verification: &VerificationResult) -> Judgment {
    resolve_with(transcript, verification, &Constitution::v1())
}

/// Resolve under an explicit constitution.
#[must_use]
pub fn resolve_with(
    transcript: &TranscriptV1,
    verification: &VerificationResult,
    constitution: &Constitution,
) -> Judgment {
    let rules = constitution.rules();
    let describes_transcript = verification.rounds_total == transcript.rounds.len() as u64;

    let trusted = match verification.integrity_status {
        IntegrityStatus::Valid if describes_transcript => transcript.rounds.as_slice(),
        _ => {
            let prefix = usize::try_from(verification.verified_prefix)
                .unwrap_or(usize::MAX)
                .min(transcript.rounds.len());
            &transcript.rounds[..prefix]
        }
    };
    let parties = Parties::from_rounds(trusted);

    let decision = match (verification.integrity_status, describes_transcript) {
        (IntegrityStatus::Valid, true) => decide_valid(transcript, trusted, &parties, rules),
        _ => Decision::tamper(verification),
    };

    let (impact, subject) = decision.impact(rules);
    let recommendation = recommend(decision.determination, decision.confidence_bps, rules);
    let last_valid = trusted.last();

    tracing::debug!(
        transcript_id = %transcript.transcript_id,
        integrity = %verification.integrity_status,
        determination = %decision.determination,
        confidence_bps = decision.confidence_bps,
        impact,
        "judgment resolved"
    );

    Judgment {
        version: JUDGMENT_VERSION.to_string(),
        transcript_id: transcript.transcript_id.clone(),
        intent_id: transcript.intent_id.clone(),
        integrity_status: verification.integrity_status,
        status: decision.status,
        failure_code: decision.failure_code,
        last_valid_round: last_valid.map(|r| r.round_number),
        last_valid_summary: last_valid.map(|r| r.content_summary.clone()),
        last_valid_hash: last_valid.map(|r| r.round_hash.clone()),
        determination: decision.determination,
        confidence_bps: decision.confidence_bps,
        passport_impact: impact,
        impact_subject: subject,
        buyer_public_key: parties.buyer.map(str::to_string),
        provider_public_key: parties.provider.map(str::to_string),
        recommendation,
        decided_at_ms: transcript.latest_timestamp_ms(),
        constitution_hash: constitution.hash().as_str().to_string(),
        judgment_digest: String::new(),
    }
    .sealed()
}

/// Judgment for input that never parsed into a transcript.
pub(crate) fn resolve_unparsed(
    verification: &VerificationResult,
    constitution: &Constitution,
) -> Judgment {
    let decision = Decision::tamper(verification);
    Judgment {
        version: JUDGMENT_VERSION.to_string(),
        transcript_id: String::new(),
        intent_id: String::new(),
        integrity_status: verification.integrity_status,
        status: decision.status,
        failure_code: None,
        last_valid_round: None,
        last_valid_summary: None,
        last_valid_hash: None,
        determination: decision.determination,
        confidence_bps: decision.confidence_bps,
        passport_impact: 0,
        impact_subject: ImpactSubject::None,
        buyer_public_key: None,
        provider_public_key: None,
        recommendation: Recommendation::Escalate,
        decided_at_ms: 0,
        constitution_hash: constitution.hash().as_str().to_string(),
        judgment_digest: String::new(),
    }
    .sealed()
}

/// The outcome part of a judgment, before impact and recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    status: OutcomeStatus,
    failure_code: Option<FailureCode>,
    determination: Determination,
    confidence_bps: u32,
    base: Base,
}

/// Which base delta applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Zero,
    Completion,
    ProviderFault,
    BuyerFault,
    Unfulfilled,
}

impl Decision {
    fn tamper(verification: &VerificationResult) -> Self {
        Self {
            status: OutcomeStatus::FailedIntegrity,
            failure_code: None,
            determination: Determination::IndeterminateTamper,
            confidence_bps: prefix_confidence(verification),
            base: Base::Zero,
        }
    }

    fn impact(&self, rules: &ConstitutionRules) -> (i64, ImpactSubject) {
        let (delta, subject) = match self.base {
            Base::Zero => return (0, ImpactSubject::None),
            Base::Completion => (rules.completion_delta, ImpactSubject::Both),
            Base::ProviderFault => (rules.provider_fault_delta, ImpactSubject::Provider),
            Base::BuyerFault => (rules.buyer_fault_delta, ImpactSubject::Buyer),
            Base::Unfulfilled => (rules.unfulfilled_delta, ImpactSubject::Provider),
        };
        // i64 division truncates toward zero.
        let scaled = delta.saturating_mul(i64::from(self.confidence_bps)) / i64::from(CONFIDENCE_SCALE_BPS);
        (scaled, subject)
    }
}

fn decide_valid(
    transcript: &TranscriptV1,
    rounds: &[RoundV1],
    parties: &Parties<'_>,
    rules: &ConstitutionRules,
) -> Decision {
    let levels = &rules.confidence;
    let sealed = transcript.final_hash.is_some();
    let settled_level = if sealed { levels.sealed } else { levels.claimed };

    match TerminalShape::of(transcript) {
        TerminalShape::Fulfilled(_) => Decision {
            status: OutcomeStatus::Completed,
            failure_code: None,
            determination: Determination::NoFault,
            confidence_bps: settled_level,
            base: Base::Completion,
        },
        TerminalShape::Unfulfilled(_) => Decision {
            status: OutcomeStatus::FailedUnfulfilled,
            failure_code: None,
            determination: Determination::ProviderAtFault,
            confidence_bps: levels.unfulfilled,
            base: Base::Unfulfilled,
        },
        TerminalShape::Failure(event) => decide_failure(event, rounds, parties, rules, sealed),
        TerminalShape::Conflicting { failure, .. } => Decision {
            status: OutcomeStatus::ConflictingTerminal,
            failure_code: Some(failure.code),
            determination: Determination::Indeterminate,
            confidence_bps: levels.conflicting,
            base: Base::Zero,
        },
        TerminalShape::Open => {
            let (determination, base) = match rules.early_stop {
                EarlyStopRule::NoFault => (Determination::NoFault, Base::Zero),
                EarlyStopRule::BuyerAtFault if parties.buyer.is_some() => {
                    (Determination::BuyerAtFault, Base::BuyerFault)
                }
                EarlyStopRule::BuyerAtFault => (Determination::Indeterminate, Base::Zero),
            };
            Decision {
                status: OutcomeStatus::EndedWithoutSettlement,
                failure_code: None,
                determination,
                confidence_bps: levels.open,
                base,
            }
        }
    }
}

fn decide_failure(
    event: &FailureEvent,
    rounds: &[RoundV1],
    parties: &Parties<'_>,
    rules: &ConstitutionRules,
    sealed: bool,
) -> Decision {
    let levels = &rules.confidence;
    let settled_level = if sealed { levels.sealed } else { levels.claimed };
    let at_fault = |determination, base, confidence_bps| Decision {
        status: OutcomeStatus::from(event.code),
        failure_code: Some(event.code),
        determination,
        confidence_bps,
        base,
    };

    match event.code {
        FailureCode::AbortedPolicy => match attribute_abort(rounds, event, parties) {
            Attribution::Signed(party) => {
                let (d, b) = fault_of(party);
                at_fault(d, b, levels.sealed)
            }
            Attribution::Claimed(party) => {
                let (d, b) = fault_of(party);
                at_fault(d, b, settled_level)
            }
            Attribution::Unattributable => {
                at_fault(Determination::Indeterminate, Base::Zero, levels.unattributable)
            }
        },
        FailureCode::FailedProviderUnreachable
        | FailureCode::FailedProviderTimeout
        | FailureCode::FailedProof => {
            // A provider that never signed a round has no key to charge:
            // the fault stands, at unattributable confidence.
            let level = if parties.provider.is_some() {
                settled_level
            } else {
                levels.unattributable
            };
            at_fault(Determination::ProviderAtFault, Base::ProviderFault, level)
        }
        FailureCode::FailedNegotiationDeadlock => {
            at_fault(Determination::NoFault, Base::Zero, settled_level)
        }
        FailureCode::FailedSettlement => {
            at_fault(Determination::Indeterminate, Base::Zero, levels.unattributable)
        }
    }
}

fn fault_of(party: Party) -> (Determination, Base) {
    match party {
        Party::Buyer => (Determination::BuyerAtFault, Base::BuyerFault),
        Party::Provider => (Determination::ProviderAtFault, Base::ProviderFault),
    }
}

/// `verified_prefix / rounds_total` in basis points.
fn prefix_confidence(verification: &VerificationResult) -> u32 {
    if verification.rounds_total == 0 {
        return 0;
    }
    let prefix = verification.verified_prefix.min(verification.rounds_total);
    let bps = prefix.saturating_mul(u64::from(CONFIDENCE_SCALE_BPS)) / verification.rounds_total;
    u32::try_from(bps).unwrap_or(CONFIDENCE_SCALE_BPS)
}

fn recommend(
    determination: Determination,
    confidence_bps: u32,
    rules: &ConstitutionRules,
) -> Recommendation {
    match determination {
        Determination::IndeterminateTamper => Recommendation::Escalate,
        _ if confidence_bps < rules.rerun_threshold_bps => Recommendation::Rerun,
        Determination::ProviderAtFault if confidence_bps >= rules.avoid_threshold_bps => {
            Recommendation::Avoid
        }
        Determination::BuyerAtFault if confidence_bps >= rules.block_threshold_bps => {
            Recommendation::Block
        }
        _ => Recommendation::Informational,
    }
}
