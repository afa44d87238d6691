//! Transcript module: rounds, the transcript record, chain rules, builder.
//!
//! Depends on `codec` and `crypto`.

pub mod builder;
pub mod chain;
pub mod model;
pub mod round;
