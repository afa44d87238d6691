//! Pact DBL: deterministic blame resolution over verified transcripts.
//!
//! # API Surface
//!
//! - [`resolve::resolve`] / [`resolve::resolve_with`] -- transcript + verification → [`judgment::Judgment`]
//! - [`adjudicate::adjudicate`] / [`adjudicate::adjudicate_bytes`] -- verify and resolve in one call
//! - [`constitution::build_constitution`] -- overrides → validated, hashed rule set
//!
//! # Module Dependency Direction
//!
//! `constitution`, `terminal` ← `judgment` ← `resolve` ← `adjudicate`

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adjudicate;
pub mod constitution;
pub mod judgment;
pub mod resolve;
pub mod terminal;
