//! Configuration system for commentator.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod commentator_config;
pub mod generation_config;
pub mod learning_config;
pub mod paths_config;
pub mod report_config;
pub mod scan_config;

pub use commentator_config::{CliOverrides, CommentatorConfig};
pub use generation_config::{FusionMode, GenerationConfig};
pub use learning_config::LearningConfig;
pub use paths_config::PathsConfig;
pub use report_config::ReportConfig;
pub use scan_config::ScanConfig;
