//! Pattern keys: (construct kind, naming bucket).

use std::fmt;
use std::str::FromStr;

use crate::structure::{Construct, ConstructKind, NamingBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternKey {
    pub kind: ConstructKind,
    pub bucket: NamingBucket,
}

impl PatternKey {
    pub fn new(kind: ConstructKind, bucket: NamingBucket) -> Self {
        Self { kind, bucket }
    }

    pub fn of(construct: &Construct) -> Self {
        Self::new(construct.kind, construct.bucket)
    }
}

/// Persisted form: `"<construct-kind>:<naming-bucket>"`.
impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.name(), self.bucket.name())
    }
}

impl FromStr for PatternKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, bucket) = s
            .split_once(':')
            .ok_or_else(|| format!("pattern key '{s}' is not '<kind>:<bucket>'"))?;
        Ok(Self::new(kind.parse()?, bucket.parse()?))
    }
}
