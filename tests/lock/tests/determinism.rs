//! Same transcript, same constitution: byte-identical judgments.

use pact_dbl::adjudicate::{adjudicate, adjudicate_bytes};
use pact_dbl::constitution::Constitution;
use pact_dbl::resolve::resolve;
use pact_kernel::crypto::signature::signing_key_from_label;
use pact_kernel::proof::replay::{replay_verify, replay_verify_bytes};
use pact_kernel::proof::verdict::IntegrityStatus;
use pact_kernel::transcript::builder::{RoundDraft, TranscriptBuilder};
use pact_kernel::transcript::model::Receipt;
use pact_kernel::transcript::round::RoundType;
use serde_json::{json, Value};

use lock_tests::fixtures::all_scenarios;

const RUNS: usize = 10;

#[test]
fn resolve_is_byte_stable() {
    for (label, t) in all_scenarios() {
        let first = resolve(&t, &replay_verify(&t)).to_canonical_bytes().unwrap();
        for _ in 1..RUNS {
            let again = resolve(&t, &replay_verify(&t)).to_canonical_bytes().unwrap();
            assert_eq!(first, again, "scenario {label}");
        }
    }
}

#[test]
fn parsed_and_in_memory_paths_agree() {
    let c = Constitution::v1();
    for (label, t) in all_scenarios() {
        let bytes = t.to_json_bytes().unwrap();
        let direct = adjudicate(&t, &c);
        let parsed = adjudicate_bytes(&bytes, &c);
        assert_eq!(direct.verification, parsed.verification, "scenario {label}");
        assert_eq!(direct.judgment, parsed.judgment, "scenario {label}");
    }
}

#[test]
fn constitution_hash_is_stable() {
    let hashes: Vec<String> = (0..RUNS)
        .map(|_| Constitution::v1().hash().as_str().to_string())
        .collect();
    assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    assert!(hashes[0].starts_with("sha256:"));
}

#[test]
fn builder_transcripts_survive_the_wire() {
    let buyer = signing_key_from_label("wire-buyer");
    let provider = signing_key_from_label("wire-provider");
    let mut b = TranscriptBuilder::new("wire", "intent-wire", 1_000);
    b.push(RoundDraft::new(RoundType::Intent, "buyer", 1_000, Value::Null), &buyer)
        .unwrap();
    b.push(
        RoundDraft::new(RoundType::Ask, "provider", 1_010, json!({"price": 700, "note": null})),
        &provider,
    )
    .unwrap();
    b.push(RoundDraft::new(RoundType::Accept, "buyer", 1_020, json!([])), &buyer)
        .unwrap();
    b.set_receipt(Receipt {
        receipt_id: "receipt-wire".into(),
        fulfilled: true,
        agreed_price: 700,
        paid_amount: 700,
        timestamp_ms: 1_030,
    });
    let t = b.finish().unwrap();

    let parsed = replay_verify_bytes(&t.to_json_bytes().unwrap());
    assert_eq!(
        parsed.verification.integrity_status,
        IntegrityStatus::Valid,
        "{:?}",
        parsed.verification.errors
    );
    assert_eq!(parsed.verification, replay_verify(&t));
    assert_eq!(parsed.transcript.as_ref(), Some(&t));

    let c = Constitution::v1();
    let bytes = t.to_json_bytes().unwrap();
    assert_eq!(adjudicate(&t, &c).judgment, adjudicate_bytes(&bytes, &c).judgment);
}
