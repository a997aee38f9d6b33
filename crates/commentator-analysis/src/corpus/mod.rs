//! Corpus access: which files to scan and how to read them.

pub mod reader;
pub mod walker;

pub use reader::{decode_source, read_source};
pub use walker::{CorpusWalker, SourceFile};
