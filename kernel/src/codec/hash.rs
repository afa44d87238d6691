//! Canonical hashing: wire digests and domain-separated content hashes.
//!
//! Two families, never mixed:
//!
//! - **Wire digests**: `hex(sha256(canonical_bytes))`, 64 lowercase hex
//!   characters, no prefix, no domain separator. Round hashes, the chain
//!   seed, envelope hashes and the terminal seal use this form because other
//!   implementations must reproduce them bit-for-bit.
//!
//! - **Content hashes**: `sha256(domain || data)` rendered as
//!   `"sha256:<hex>"` ([`ContentHash`]). Used for artifacts this workspace
//!   originates (constitution snapshots, judgment digests, ledger rows).

use sha2::{Digest, Sha256};

use crate::codec::canon::{canonical_json_bytes, CanonError};
pub use crate::codec::hash_domain::HashDomain;

/// Length of a wire digest in hex characters.
pub const HEX_DIGEST_LEN: usize = 64;

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`)
///
/// Invariant: the inner string always contains exactly one `:` separator,
/// with non-empty substrings on both sides (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the format is invalid (missing colon,
    /// empty algorithm, or empty digest).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full string representation (`"algorithm:hex_digest"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Compute the domain-separated content hash of a byte slice.
///
/// Formula: `sha256(domain.as_bytes() || data)`, rendered `"sha256:<hex>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let hex = hex::encode(hasher.finalize());
    let colon = "sha256".len();
    ContentHash {
        full: format!("sha256:{hex}"),
        colon,
    }
}

/// Plain SHA-256 of `data` as 64 lowercase hex characters.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Wire digest of a JSON value: `hex(sha256(canonical_json_bytes(value)))`.
///
/// # Errors
///
/// Returns [`CanonError`] if the value is not canonically encodable.
pub fn wire_digest(value: &serde_json::Value) -> Result<String, CanonError> {
    Ok(sha256_hex(&canonical_json_bytes(value)?))
}

/// Whether `s` has the shape of a wire digest (64 lowercase hex chars).
#[must_use]
pub fn is_wire_digest(s: &str) -> bool {
    s.len() == HEX_DIGEST_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Decode a wire digest to its raw 32 bytes.
///
/// Returns `None` for anything that is not exactly 64 lowercase hex chars.
#[must_use]
pub fn wire_digest_bytes(s: &str) -> Option<[u8; 32]> {
    if !is_wire_digest(s) {
        return None;
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).ok()?;
    Some(out)
}
