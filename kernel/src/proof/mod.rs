//! Proof module: replay verification and its verdict types.
//!
//! Depends on `codec`, `crypto` and `transcript`. Nothing in the kernel
//! depends on `proof`.

pub mod replay;
pub mod verdict;
