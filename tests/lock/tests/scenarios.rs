//! End-to-end scenarios A–D: verify, resolve, ingest.

use pact_dbl::adjudicate::adjudicate;
use pact_dbl::constitution::Constitution;
use pact_dbl::judgment::{Determination, ImpactSubject, OutcomeStatus, Recommendation};
use pact_kernel::proof::verdict::{IntegrityStatus, VerificationErrorKind};
use pact_passport::ledger::PassportLedger;

use lock_tests::fixtures::{
    buyer_b58, init_tracing, provider_b58, scenario_a, scenario_b, scenario_c, scenario_d,
};

#[test]
fn scenario_a_completed_no_fault() {
    init_tracing();
    let out = adjudicate(&scenario_a(), &Constitution::v1());
    assert_eq!(out.verification.integrity_status, IntegrityStatus::Valid);
    assert_eq!(out.verification.verified_prefix, 3);
    let j = &out.judgment;
    assert_eq!(j.status(), OutcomeStatus::Completed);
    assert_eq!(j.determination(), Determination::NoFault);
    assert!(j.passport_impact() > 0);
    assert_eq!(j.impact_subject(), ImpactSubject::Both);
    assert_eq!(j.recommendation(), Recommendation::Informational);
    assert_eq!(j.buyer_public_key(), Some(buyer_b58().as_str()));
    assert_eq!(j.provider_public_key(), Some(provider_b58().as_str()));
}

#[test]
fn scenario_b_buyer_at_fault() {
    init_tracing();
    let out = adjudicate(&scenario_b(), &Constitution::v1());
    assert_eq!(out.verification.integrity_status, IntegrityStatus::Valid);
    let j = &out.judgment;
    assert_eq!(j.status(), OutcomeStatus::AbortedPolicy);
    assert_eq!(j.determination(), Determination::BuyerAtFault);
    assert!(j.passport_impact() < 0);
    assert_eq!(j.impact_subject(), ImpactSubject::Buyer);
    assert_eq!(j.impact_for(&provider_b58()), 0);
}

#[test]
fn scenario_c_provider_at_fault() {
    init_tracing();
    let out = adjudicate(&scenario_c(), &Constitution::v1());
    assert_eq!(out.verification.integrity_status, IntegrityStatus::Valid);
    let j = &out.judgment;
    assert_eq!(j.status(), OutcomeStatus::FailedProviderUnreachable);
    assert_eq!(j.determination(), Determination::ProviderAtFault);
    assert!(j.passport_impact() < 0);
    assert_eq!(j.impact_subject(), ImpactSubject::Provider);
    assert_eq!(j.recommendation(), Recommendation::Avoid);
}

#[test]
fn scenario_d_tampered_zero_impact() {
    init_tracing();
    let out = adjudicate(&scenario_d(), &Constitution::v1());
    assert_eq!(out.verification.integrity_status, IntegrityStatus::Tampered);
    assert!(!out.verification.errors.is_empty());
    assert!(out
        .verification
        .has_error(VerificationErrorKind::RoundHashMismatch));
    let j = &out.judgment;
    assert_eq!(j.status(), OutcomeStatus::FailedIntegrity);
    assert_eq!(j.determination(), Determination::IndeterminateTamper);
    assert_eq!(j.passport_impact(), 0);
    assert_eq!(j.recommendation(), Recommendation::Escalate);
}

#[test]
fn scenarios_feed_the_ledger() {
    init_tracing();
    let ledger = PassportLedger::default();
    let c = Constitution::v1();
    for t in [scenario_a(), scenario_b(), scenario_c(), scenario_d()] {
        let j = adjudicate(&t, &c).judgment;
        for signer in [buyer_b58(), provider_b58()] {
            // D only verified its first two rounds, both parties are known.
            ledger.ingest(&j, &signer).unwrap();
        }
    }
    let buyer = ledger.entry(&buyer_b58()).unwrap();
    let provider = ledger.entry(&provider_b58()).unwrap();
    assert_eq!(buyer.history.len(), 4);
    assert_eq!(provider.history.len(), 4);
    // A: +10 both. B: -10 buyer. C: -20 provider. D: 0.
    assert_eq!(buyer.score, 500);
    assert_eq!(provider.score, 490);
    assert_eq!(buyer.constitution_hashes.len(), 1);
}
