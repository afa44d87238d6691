//! Ed25519 signature layer over canonical bytes.
//!
//! Fixed scheme: Ed25519 (32-byte raw public keys, 64-byte detached
//! signatures, deterministic signing). Keys and signatures travel as base58
//! (Bitcoin alphabet).
//!
//! Every `verify*` function here is total: malformed base58, wrong-length
//! keys, non-canonical points and wrong-length signatures all yield `false`.
//! Nothing in this module panics on caller input.
//!
//! The signed subject of a transcript round is the raw 32 bytes of its
//! envelope hash, not the hex text.

use ed25519_dalek::{Signature, Signer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec::canon::CanonError;
use crate::codec::hash::{wire_digest, wire_digest_bytes};
use crate::codec::hash_domain::HashDomain;

pub use ed25519_dalek::{SigningKey, VerifyingKey};

/// Raw public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Detached signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Scheme identifier carried by [`SignedEnvelope`].
pub const SIGNATURE_SCHEME: &str = "ed25519";

/// Errors from key decoding and envelope sealing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// The text is not valid base58.
    #[error("invalid base58: {detail}")]
    InvalidBase58 { detail: String },
    /// Decoded public key has the wrong length.
    #[error("public key must be {PUBLIC_KEY_LEN} bytes, got {len}")]
    PublicKeyLength { len: usize },
    /// Decoded bytes are not a valid Ed25519 point.
    #[error("public key is not a valid Ed25519 point")]
    InvalidPublicKey,
    /// The envelope hash is not a 64-char lowercase hex digest.
    #[error("envelope hash is not a 64-char lowercase hex digest")]
    MalformedEnvelopeHash,
    /// The message could not be canonicalized.
    #[error(transparent)]
    Canon(#[from] CanonError),
}

/// Sign `bytes` with `key`, returning the 64-byte detached signature.
#[must_use]
pub fn sign(bytes: &[u8], key: &SigningKey) -> [u8; SIGNATURE_LEN] {
    key.sign(bytes).to_bytes()
}

/// Verify a detached signature over `bytes` against a raw public key.
///
/// Returns `false` for wrong-length inputs, invalid points, or a signature
/// that does not verify. Uses strict verification (rejects small-order keys
/// and non-canonical encodings).
#[must_use]
pub fn verify(bytes: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(key_bytes) = <[u8; PUBLIC_KEY_LEN]>::try_from(public_key) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; SIGNATURE_LEN]>::try_from(signature) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    key.verify_strict(bytes, &Signature::from_bytes(&sig_bytes))
        .is_ok()
}

/// [`verify`] with base58-encoded signature and public key.
#[must_use]
pub fn verify_b58(bytes: &[u8], signature_b58: &str, public_key_b58: &str) -> bool {
    let (Ok(sig), Ok(key)) = (
        bs58::decode(signature_b58).into_vec(),
        bs58::decode(public_key_b58).into_vec(),
    ) else {
        return false;
    };
    verify(bytes, &sig, &key)
}

/// Decode a base58 public key into a usable [`VerifyingKey`].
///
/// The replay verifier uses this to tell an *unresolvable* key apart from a
/// key that resolves but does not verify the signature.
///
/// # Errors
///
/// Returns [`CryptoError`] for bad base58, wrong length, or an invalid point.
pub fn decode_public_key_b58(public_key_b58: &str) -> Result<VerifyingKey, CryptoError> {
    let raw = bs58::decode(public_key_b58)
        .into_vec()
        .map_err(|e| CryptoError::InvalidBase58 {
            detail: e.to_string(),
        })?;
    let bytes: [u8; PUBLIC_KEY_LEN] = raw
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::PublicKeyLength { len: raw.len() })?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Base58-encode arbitrary bytes.
#[must_use]
pub fn encode_b58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Base58 public key of a signing key.
#[must_use]
pub fn public_key_b58(key: &SigningKey) -> String {
    encode_b58(key.verifying_key().as_bytes())
}

/// Sign a wire envelope hash (its raw 32 bytes), returning base58.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelopeHash`] if `envelope_hash` is not
/// a 64-char lowercase hex digest.
pub fn sign_envelope_hash(envelope_hash: &str, key: &SigningKey) -> Result<String, CryptoError> {
    let raw = wire_digest_bytes(envelope_hash).ok_or(CryptoError::MalformedEnvelopeHash)?;
    Ok(encode_b58(&sign(&raw, key)))
}

/// Verify a base58 signature over a wire envelope hash. Total.
#[must_use]
pub fn verify_envelope_hash(envelope_hash: &str, signature_b58: &str, public_key_b58: &str) -> bool {
    match wire_digest_bytes(envelope_hash) {
        Some(raw) => verify_b58(&raw, signature_b58, public_key_b58),
        None => false,
    }
}

/// Derive a deterministic signing key from a human-readable label.
///
/// Seed: `sha256(PACT::FIXTURE_KEY::V1\0 || label)`. For fixtures and
/// reproducible tests only; production keys come from the caller.
#[must_use]
pub fn signing_key_from_label(label: &str) -> SigningKey {
    let mut hasher = Sha256::new();
    hasher.update(HashDomain::FixtureKey.as_bytes());
    hasher.update(label.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize());
    SigningKey::from_bytes(&seed)
}

/// A transportable signed envelope: content hash plus the key and detached
/// signature that vouch for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Always [`SIGNATURE_SCHEME`] for envelopes produced here.
    pub scheme: String,
    /// `hex(sha256(canonical(message)))`.
    pub envelope_hash: String,
    pub signer_public_key_b58: String,
    pub signature_b58: String,
}

impl SignedEnvelope {
    /// Hash `message` canonically and sign the digest with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Canon`] if the message contains floats.
    pub fn seal(message: &serde_json::Value, key: &SigningKey) -> Result<Self, CryptoError> {
        let envelope_hash = wire_digest(message)?;
        let signature_b58 = sign_envelope_hash(&envelope_hash, key)?;
        Ok(Self {
            scheme: SIGNATURE_SCHEME.to_string(),
            envelope_hash,
            signer_public_key_b58: public_key_b58(key),
            signature_b58,
        })
    }

    /// Check the signature over the carried envelope hash. Total.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.scheme == SIGNATURE_SCHEME
            && verify_envelope_hash(
                &self.envelope_hash,
                &self.signature_b58,
                &self.signer_public_key_b58,
            )
    }

    /// Check the signature and that `message` hashes to the carried digest.
    #[must_use]
    pub fn verify_message(&self, message: &serde_json::Value) -> bool {
        matches!(wire_digest(message), Ok(h) if h == self.envelope_hash) && self.verify()
    }
}
