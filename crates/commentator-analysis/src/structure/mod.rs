//! Structural scanner: shallow, non-compiling C++ structure recovery.
//!
//! Reconstructs a scope tree (file → namespace/class → function → block) and
//! streams the constructs worth commenting: variable declarations, function
//! definitions, loops and conditionals, each with its local facts.

pub mod construct;
pub mod naming;
pub mod scanner;
pub mod scope;

pub use construct::{BitOperator, Construct, ConstructFacts, ConstructKind, SourceLocation};
pub use naming::NamingBucket;
pub use scanner::{scan_source, ConstructStream, FileScan, ScanStats};
pub use scope::{BlockTag, ScopeId, ScopeKind, ScopeNode, ScopeTree};
