//! commentator-core: shared foundations for the comment-suggestion engine.
//!
//! - Errors: one `thiserror` enum per subsystem, aggregated by `PipelineError`
//! - Config: TOML-based layered configuration
//! - Tracing: `tracing-subscriber` setup driven by `COMMENTATOR_LOG`
//! - Types: collection aliases shared by the analysis crate

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::CommentatorConfig;
pub use errors::{ErrorCode, PipelineError};
