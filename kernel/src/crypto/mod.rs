//! Crypto module: the Ed25519 signature layer.
//!
//! Depends on `codec` only.

pub mod signature;
