//! Channel layer: response accumulation and classification.
//!
//! This module holds the pieces the session engine runs on every poll tick:
//! the sliding-window buffer and the token matcher.

mod buffer;
mod matcher;

pub use buffer::AccumulationBuffer;
pub use matcher::{MatchTokens, Verdict, classify};
