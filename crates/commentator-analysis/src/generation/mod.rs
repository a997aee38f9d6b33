//! Suggestion generation.
//!
//! For each construct without a comment, the engine looks up dictionary
//! meanings for its identifier and literals, picks the best learned template
//! for its (kind, naming bucket) key, and fuses the two into one suggestion
//! with a confidence and a record of which signals contributed.

pub mod confidence;
pub mod engine;
pub mod fallback;
pub mod suggestion;

pub use confidence::GenerationSettings;
pub use engine::{GenerationStats, Outcome, SuggestionEngine};
pub use suggestion::{PatternHit, Provenance, Signal, Suggestion};
