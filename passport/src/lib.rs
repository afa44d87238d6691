//! Pact Passport: append-only reputation fed exclusively by judgments.
//!
//! # API Surface
//!
//! - [`ledger::PassportLedger::ingest`] -- record a judgment for one party
//! - [`ledger::PassportLedger::entry`] -- score, tier and history for a signer
//! - [`config::LedgerConfig`] -- score bounds and tier thresholds
//!
//! Scores are never stored. They are folded from history on every read, so
//! nothing a past ingest produced is ever overwritten.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
