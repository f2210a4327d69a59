//! Recommendation reasoning: decide why a target course follows from a
//! learner's history, then render the justification as one Chinese
//! sentence.
//!
//! Three mutually exclusive strategies, first match wins:
//! prerequisite satisfaction > topical continuation > description fallback.
//! The tagged [`Justification`] separates the decision from the wording.

mod decision;
mod render;

pub use decision::{decide, Justification};
pub use render::{generate_reason, render};
