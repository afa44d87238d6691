//! Cross-process determinism.
//!
//! Spawns the `transcript_fixture` binary under several environment
//! variants and checks that every run prints the same lines, and that
//! those lines match the values computed in this process.

use std::path::Path;
use std::process::Command;

use pact_dbl::adjudicate::adjudicate;
use pact_dbl::constitution::Constitution;
use pact_kernel::codec::canon::canonical_bytes_of;
use pact_kernel::codec::hash::sha256_hex;

use lock_tests::fixtures::all_scenarios;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_transcript_fixture");
    let mut command = Command::new(bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "transcript_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn in_process_lines() -> String {
    let constitution = Constitution::v1();
    let mut out = format!("constitution_hash={}\n", constitution.hash());
    for (label, t) in all_scenarios() {
        let a = adjudicate(&t, &constitution);
        let sha = sha256_hex(&canonical_bytes_of(&t).unwrap());
        out.push_str(&format!("{label}_transcript_sha256={sha}\n"));
        out.push_str(&format!("{label}_integrity={}\n", a.verification.integrity_status));
        out.push_str(&format!("{label}_determination={}\n", a.judgment.determination()));
        out.push_str(&format!("{label}_impact={}\n", a.judgment.passport_impact()));
        out.push_str(&format!("{label}_judgment_digest={}\n", a.judgment.judgment_digest()));
    }
    out
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);
    assert!(baseline.contains("constitution_hash=sha256:"));
    assert!(baseline.contains("a_integrity=VALID"));
    assert!(baseline.contains("d_integrity=TAMPERED"));

    let alt_cwd = if cfg!(target_os = "windows") { "C:\\" } else { "/tmp" };
    assert_eq!(baseline, run_variant(alt_cwd, &[]), "cwd {alt_cwd}");

    let locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, locale, "LC_ALL=C LANG=C");

    let noise = run_variant(
        &root,
        &[
            ("PACT_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("HOME", "/nonexistent"),
            ("RUST_LOG", "debug"),
        ],
    );
    assert_eq!(baseline, noise, "spurious env vars");
}

#[test]
fn crossproc_matches_in_process() {
    assert_eq!(run_variant(&workspace_root(), &[]), in_process_lines());
}
