//! Shared data structure aliases.

pub mod collections;

pub use collections::{FxHashMap, FxHashSet, SmallVec2, SmallVec4};
