//! Pact kernel: canonical encoding, signatures, transcripts, replay.
//!
//! # API Surface
//!
//! - [`codec::canon::canonical_json_bytes`] -- the single canonical JSON encoder
//! - [`crypto::signature`] -- Ed25519 sign / verify over canonical bytes
//! - [`transcript::builder::TranscriptBuilder`] -- produce a signed, hash-linked transcript
//! - [`proof::replay::replay_verify`] -- verify a transcript by recomputation
//!
//! # Module Dependency Direction
//!
//! `codec` ← `crypto` ← `transcript` ← `proof`
//!
//! One-way only. No cycles. `codec` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod crypto;
pub mod proof;
pub mod transcript;
