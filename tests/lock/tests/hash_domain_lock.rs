//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. Canonical domain set has expected count (catches forgotten additions to ALL)
//! 2. All domain byte strings are unique (prevents domain collision)
//! 3. All domains are null-terminated (wire format invariant)
//! 4. All domains follow `PACT::*::V1\0` naming convention
//! 5. No raw `PACT::` domain literals in production source outside `hash_domain.rs`
//! 6. No `deny_unknown_fields` in production source (rounds must keep unknown fields)
//! 7. Exactly one canonical JSON implementation in the workspace

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pact_kernel::codec::hash::HashDomain;

const PRODUCTION_DIRS: [&str; 3] = [
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../kernel/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../dbl/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../passport/src"),
];

// ---------------------------------------------------------------------------
// 1. Canonical set count
// ---------------------------------------------------------------------------

#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        5,
        "expected 5 domain variants; if you added a new domain, update this count"
    );
}

// ---------------------------------------------------------------------------
// 2. All unique bytes
// ---------------------------------------------------------------------------

#[test]
fn hash_domain_all_unique_bytes() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(
            seen.insert(domain.as_bytes()),
            "duplicate domain bytes: {domain}"
        );
    }
}

// ---------------------------------------------------------------------------
// 3. All null-terminated
// ---------------------------------------------------------------------------

#[test]
fn hash_domain_all_null_terminated() {
    for domain in HashDomain::ALL {
        assert!(
            domain.as_bytes().ends_with(&[0]),
            "{domain} is not null-terminated"
        );
    }
}

// ---------------------------------------------------------------------------
// 4. Naming convention
// ---------------------------------------------------------------------------

#[test]
fn hash_domain_all_follow_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(bytes.starts_with(b"PACT::"), "{domain} does not start with PACT::");
        assert!(bytes.ends_with(b"::V1\0"), "{domain} does not end with ::V1\\0");
    }
}

// ---------------------------------------------------------------------------
// 5. No raw PACT:: domain literals in production source
// ---------------------------------------------------------------------------

#[test]
fn no_raw_domain_literals_outside_authority() {
    let violations = find_in_production("b\"PACT::", |path| !path.ends_with("codec/hash_domain.rs"));
    assert!(
        violations.is_empty(),
        "raw PACT:: domain literals found outside hash_domain.rs:\n{}",
        violations.join("\n")
    );
}

// ---------------------------------------------------------------------------
// 6. No deny_unknown_fields in production source
// ---------------------------------------------------------------------------

#[test]
fn no_deny_unknown_fields_in_production_code() {
    let violations = find_in_production("deny_unknown_fields", |_| true);
    assert!(
        violations.is_empty(),
        "deny_unknown_fields found in production code:\n{}",
        violations.join("\n")
    );
}

// ---------------------------------------------------------------------------
// 7. One canonicalizer
// ---------------------------------------------------------------------------

#[test]
fn one_canonical_json_implementation() {
    let mut defining: Vec<String> = ["fn canonical_json_bytes", "fn canonicalize_json", "fn json_canonical"]
        .iter()
        .flat_map(|needle| find_in_production(needle, |_| true))
        .map(|hit| hit.split(':').next().unwrap_or_default().to_string())
        .collect();
    defining.sort();
    defining.dedup();
    assert_eq!(
        defining.len(),
        1,
        "expected exactly 1 canonical JSON implementation, found {defining:?}"
    );
    assert!(defining[0].ends_with("codec/canon.rs"), "found in {}", defining[0]);
}

/// `path:line: text` for every non-comment production line containing
/// `needle`. Test modules always close a file, so scanning stops at the
/// first `#[cfg(test)]`.
fn find_in_production(needle: &str, include: impl Fn(&Path) -> bool) -> Vec<String> {
    let mut files = Vec::new();
    for dir in PRODUCTION_DIRS {
        collect_rust_files(Path::new(dir), &mut files);
    }
    files.sort();

    let mut hits = Vec::new();
    for path in files.iter().filter(|p| include(p)) {
        let source = std::fs::read_to_string(path).unwrap_or_default();
        let production = source
            .lines()
            .enumerate()
            .take_while(|(_, line)| !line.contains("#[cfg(test)]"));
        for (i, line) in production {
            let code = line.trim();
            if !code.starts_with("//") && code.contains(needle) {
                hits.push(format!("{}:{}: {code}", path.display(), i + 1));
            }
        }
    }
    hits
}

fn collect_rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else { return };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_rust_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}
