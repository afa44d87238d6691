//! Binary that builds scenarios A–D, adjudicates each under the v1
//! constitution, and prints deterministic `key=value` lines for
//! cross-process verification.
//!
//! Usage: `transcript_fixture`
//! Output: one `constitution_hash` line, then per scenario `<s>`:
//!   `<s>_transcript_sha256`=<hex of canonical transcript bytes>
//!   `<s>_integrity`=VALID|TAMPERED|...
//!   `<s>_determination`=NO_FAULT|...
//!   `<s>_impact`=<i64>
//!   `<s>_judgment_digest`=sha256:...

use pact_dbl::adjudicate::adjudicate;
use pact_dbl::constitution::Constitution;
use pact_kernel::codec::canon::canonical_bytes_of;
use pact_kernel::codec::hash::sha256_hex;

use lock_tests::fixtures::all_scenarios;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the comparison lines, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let constitution = Constitution::v1();
    println!("constitution_hash={}", constitution.hash());

    for (label, transcript) in all_scenarios() {
        let outcome = adjudicate(&transcript, &constitution);
        let transcript_sha = sha256_hex(&canonical_bytes_of(&transcript)?);
        println!("{label}_transcript_sha256={transcript_sha}");
        println!("{label}_integrity={}", outcome.verification.integrity_status);
        println!("{label}_determination={}", outcome.judgment.determination());
        println!("{label}_impact={}", outcome.judgment.passport_impact());
        println!("{label}_judgment_digest={}", outcome.judgment.judgment_digest());
    }
    Ok(())
}
