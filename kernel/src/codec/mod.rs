//! Codec module: canonical JSON bytes and the hashes computed over them.
//!
//! This is the foundational layer. No other kernel module is imported here.

pub mod canon;
pub mod hash;
pub mod hash_domain;
