//! commentator-analysis: the comment-suggestion engine.
//!
//! - `lexer`: C/C++ tokens plus a comment side channel
//! - `structure`: scope tree, naming buckets, and the structural scanner
//! - `dictionary`: domain meanings for identifiers and magic values
//! - `patterns`: phrasing templates learned from commented code
//! - `generation`: fusing patterns and dictionary into suggestions
//! - `corpus`, `pipeline`, `report`: walking trees, running passes, rendering output

pub mod corpus;
pub mod dictionary;
pub mod generation;
pub mod lexer;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod structure;

pub use dictionary::Dictionary;
pub use generation::{Suggestion, SuggestionEngine};
pub use patterns::PatternModel;
pub use structure::{Construct, ConstructKind, NamingBucket};
