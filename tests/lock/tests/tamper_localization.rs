//! A single-round edit is reported at exactly that round.

use pact_kernel::proof::replay::replay_verify;
use pact_kernel::proof::verdict::{IntegrityStatus, VerificationErrorKind};
use serde_json::json;

use lock_tests::fixtures::{all_scenarios, flip_summary};

#[test]
fn every_summary_flip_names_its_round() {
    for (label, honest) in all_scenarios() {
        if label == "d" {
            continue;
        }
        for i in 0..honest.rounds.len() {
            let mut t = honest.clone();
            flip_summary(&mut t, i);
            let r = replay_verify(&t);
            assert_eq!(r.integrity_status, IntegrityStatus::Tampered, "{label} round {i}");
            assert_eq!(r.implicated_rounds(), vec![i as u64], "{label} round {i}");
            assert_eq!(r.verified_prefix, i as u64, "{label} round {i}");
        }
    }
}

#[test]
fn message_edit_names_its_round() {
    let scenarios = all_scenarios();
    let (_, honest) = &scenarios[0];
    for i in 0..honest.rounds.len() {
        let mut t = honest.clone();
        t.rounds[i].message = Some(json!({"price": 1}));
        let r = replay_verify(&t);
        assert_eq!(r.integrity_status, IntegrityStatus::Tampered);
        assert!(r.has_error(VerificationErrorKind::EnvelopeHashMismatch));
        assert_eq!(r.implicated_rounds(), vec![i as u64]);
    }
}

#[test]
fn scenario_d_names_round_two() {
    let (label, d) = all_scenarios().remove(3);
    assert_eq!(label, "d");
    let r = replay_verify(&d);
    assert_eq!(r.implicated_rounds(), vec![2]);
    assert_eq!(r.verified_prefix, 2);
    assert_eq!(r.rounds_total, 3);
}

#[test]
fn dropping_the_receipt_breaks_only_the_seal() {
    let (_, mut t) = all_scenarios().remove(0);
    t.receipt = None;
    let r = replay_verify(&t);
    assert_eq!(r.integrity_status, IntegrityStatus::Tampered);
    assert!(r.has_error(VerificationErrorKind::FinalHashMismatch));
    assert!(r.implicated_rounds().is_empty());
    assert_eq!(r.verified_prefix, 3);
}
