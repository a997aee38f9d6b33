//! Pattern learning: phrasing templates keyed by construct kind and naming
//! bucket.
//!
//! Learning builds one `PatternTable` per file, merges them, and finalizes
//! the result into a read-only `PatternModel` that suggestion runs load.

pub mod key;
pub mod learner;
pub mod model;
pub mod table;
pub mod template;

pub use key::PatternKey;
pub use learner::{LearnStats, PatternLearner};
pub use model::{PatternEntry, PatternModel};
pub use table::{PatternTable, SeenAt, TemplateStats};
pub use template::{instantiate, slot_comment, FillValue, Instantiated, SlotFill};
