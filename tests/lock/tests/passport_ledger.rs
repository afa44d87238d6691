//! Ledger behaviour over real adjudications.

use std::thread;

use pact_dbl::adjudicate::{adjudicate, adjudicate_bytes};
use pact_dbl::constitution::{build_constitution, Constitution, ConstitutionConfig};
use pact_passport::config::LedgerConfig;
use pact_passport::entry::Tier;
use pact_passport::error::LedgerError;
use pact_passport::ledger::PassportLedger;

use lock_tests::fixtures::{
    buyer_b58, init_tracing, provider_b58, scenario_a, scenario_b, scenario_c,
};

#[test]
fn duplicate_ingest_is_rejected_and_changes_nothing() {
    init_tracing();
    let ledger = PassportLedger::default();
    let j = adjudicate(&scenario_a(), &Constitution::v1()).judgment;
    let first = ledger.ingest(&j, &buyer_b58()).unwrap();
    let err = ledger.ingest(&j, &buyer_b58()).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyIngested { .. }));
    assert!(!err.is_contract_violation());
    assert_eq!(ledger.entry(&buyer_b58()).unwrap(), first);
    assert_eq!(ledger.row_count(), 1);
}

#[test]
fn concurrent_ingest_of_one_judgment_counts_once() {
    init_tracing();
    let ledger = PassportLedger::default();
    let j = adjudicate(&scenario_c(), &Constitution::v1()).judgment;
    let provider = provider_b58();
    let accepted = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| ledger.ingest(&j, &provider).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join())
            .filter(|r| matches!(r, Ok(true)))
            .count()
    });
    assert_eq!(accepted, 1);
    let entry = ledger.entry(&provider).unwrap();
    assert_eq!(entry.history.len(), 1);
    assert_eq!(entry.score, 480);
}

#[test]
fn outsider_cannot_claim_a_judgment() {
    let ledger = PassportLedger::default();
    let j = adjudicate(&scenario_b(), &Constitution::v1()).judgment;
    let err = ledger.ingest(&j, "NotAParty1111").unwrap_err();
    assert!(matches!(err, LedgerError::NotAParty { .. }));
    assert!(ledger.is_empty());
}

#[test]
fn malformed_bytes_never_reach_the_ledger() {
    let ledger = PassportLedger::default();
    let j = adjudicate_bytes(b"{not json", &Constitution::v1()).judgment;
    let err = ledger.ingest(&j, &buyer_b58()).unwrap_err();
    assert!(matches!(err, LedgerError::EmptyTranscriptId));
    assert!(ledger.is_empty());
}

#[test]
fn history_spans_constitutions() {
    let ledger = PassportLedger::default();
    let v1 = Constitution::v1();
    let harsh = build_constitution(&ConstitutionConfig {
        provider_fault_delta: Some(-60),
        ..ConstitutionConfig::default()
    })
    .unwrap();
    assert_ne!(v1.hash(), harsh.hash());

    ledger
        .ingest(&adjudicate(&scenario_a(), &v1).judgment, &provider_b58())
        .unwrap();
    let entry = ledger
        .ingest(&adjudicate(&scenario_c(), &harsh).judgment, &provider_b58())
        .unwrap();
    assert_eq!(entry.score, 500 + 10 - 60);
    assert_eq!(entry.constitution_hashes.len(), 2);
    assert_eq!(entry.tier, Tier::Standard);
}

#[test]
fn rescore_and_export() {
    let ledger = PassportLedger::default();
    let c = Constitution::v1();
    for t in [scenario_a(), scenario_b()] {
        ledger.ingest(&adjudicate(&t, &c).judgment, &buyer_b58()).unwrap();
    }
    let strict = LedgerConfig {
        initial_score: 300,
        ..LedgerConfig::default()
    };
    let rescored = ledger.rescore(&buyer_b58(), &strict).unwrap().unwrap();
    assert_eq!(rescored.score, 300);
    assert_eq!(rescored.tier, Tier::Probation);
    assert_eq!(ledger.entry(&buyer_b58()).unwrap().score, 500);

    let lines = ledger.export_rows().unwrap();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(v["signer"], buyer_b58());
        assert!(v["row_hash"].as_str().unwrap().starts_with("sha256:"));
    }
    assert_eq!(lines, ledger.export_rows().unwrap());
}
