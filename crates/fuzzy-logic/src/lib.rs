//! Minimal Mamdani fuzzy-inference engine.
//!
//! Built for scoring decisions in a turn-based AI:
//!
//! - **Text-configured**: variables, membership terms and the rule base are
//!   loaded from a plain-text file, so tuning needs no recompile
//! - **Deterministic**: identical configuration and inputs always produce
//!   identical outputs (fixed-resolution centroid defuzzification)
//! - **Re-entrant**: `process()` only touches per-engine state, so callers
//!   may pool engines and evaluate in parallel
//!
//! Inference uses min for AND, max for OR, min implication, max aggregation
//! and centroid defuzzification.

pub mod engine;
pub mod error;
pub mod parser;
pub mod rule;
pub mod term;
pub mod variable;

pub use engine::Engine;
pub use error::FuzzyError;
pub use rule::{Connective, Rule};
pub use term::{Shape, Term};
pub use variable::Variable;
