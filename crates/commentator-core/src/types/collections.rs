//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec for literal values referenced by a construct header (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;

/// SmallVec for per-suggestion signal hits (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
