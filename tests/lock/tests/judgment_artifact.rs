//! Judgments written to disk read back intact and still verify.

use std::fs;

use pact_dbl::adjudicate::adjudicate;
use pact_dbl::constitution::Constitution;
use pact_dbl::judgment::Judgment;

use lock_tests::fixtures::all_scenarios;

#[test]
fn written_judgments_read_back_with_matching_digest() {
    let dir = tempfile::tempdir().unwrap();
    let c = Constitution::v1();
    for (label, t) in all_scenarios() {
        let judgment = adjudicate(&t, &c).judgment;
        let path = dir.path().join(format!("judgment_{label}.json"));
        fs::write(&path, judgment.to_canonical_bytes().unwrap()).unwrap();

        let back = Judgment::from_json_bytes(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, judgment, "scenario {label}");
        assert!(back.digest_matches(), "scenario {label}");
        assert_eq!(back.to_canonical_bytes().unwrap(), fs::read(&path).unwrap());
    }
}

#[test]
fn absent_optionals_stay_absent() {
    let (_, a) = all_scenarios().remove(0);
    let judgment = adjudicate(&a, &Constitution::v1()).judgment;
    let v: serde_json::Value = serde_json::from_slice(&judgment.to_canonical_bytes().unwrap()).unwrap();
    assert!(v.get("failure_code").is_none());
    assert!(v.get("last_valid_round").is_some());
}

#[test]
fn edited_artifact_fails_its_digest() {
    let dir = tempfile::tempdir().unwrap();
    let (_, c) = all_scenarios().remove(2);
    let judgment = adjudicate(&c, &Constitution::v1()).judgment;
    let path = dir.path().join("judgment_c.json");
    fs::write(&path, judgment.to_canonical_bytes().unwrap()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let edited = text.replace("\"passport_impact\":-20", "\"passport_impact\":0");
    assert_ne!(text, edited);
    fs::write(&path, edited).unwrap();

    let back = Judgment::from_json_bytes(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(back.passport_impact(), 0);
    assert!(!back.digest_matches());
}
