//! Session layer: the AT-command send/await/classify engine.
//!
//! A session sends one command line, then polls the byte sink on a fixed
//! interval, appending to the accumulation buffer and classifying the whole
//! window on every tick until a token appears or the budget runs out.

mod builder;
mod engine;
mod outcome;

pub use builder::SessionBuilder;
pub use engine::{Resolution, SessionEngine, SessionState};
pub use outcome::{Outcome, Response};
