//! Match-and-replace engine.
//!
//! Scans a string for successive occurrences of a literal or regex pattern,
//! shows each one with its surrounding lines, and applies or skips it based
//! on a caller-supplied decision.

pub mod context;
mod engine;

pub use context::{MatchContext, CONTEXT_LINES};
pub use engine::{AcceptAll, Decide, MatchSpec, Replacer};
