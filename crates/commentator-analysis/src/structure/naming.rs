//! Naming-convention buckets.
//!
//! Learned phrasing is keyed by construct kind *and* naming style, because a
//! codebase documents `i` differently from `kMaxPlayers` or `terrain_height`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse classification of an identifier's naming style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingBucket {
    ShortLoopVariable,
    ConstantCase,
    Prefixed,
    Suffixed,
    LongDescriptive,
    SingleWord,
    Unnamed,
}

impl NamingBucket {
    pub const ALL: [NamingBucket; 7] = [
        Self::ShortLoopVariable,
        Self::ConstantCase,
        Self::Prefixed,
        Self::Suffixed,
        Self::LongDescriptive,
        Self::SingleWord,
        Self::Unnamed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortLoopVariable => "short-loop-variable",
            Self::ConstantCase => "constant-case",
            Self::Prefixed => "prefixed",
            Self::Suffixed => "suffixed",
            Self::LongDescriptive => "long-descriptive",
            Self::SingleWord => "single-word",
            Self::Unnamed => "unnamed",
        }
    }

    /// Classify an identifier. Rules apply in order; the first match wins.
    pub fn classify(identifier: Option<&str>) -> Self {
        let Some(name) = identifier.filter(|n| !n.is_empty()) else {
            return Self::Unnamed;
        };
        // Only the last segment of a qualified name matters.
        let name = name.rsplit("::").next().unwrap_or(name);
        let name = name.trim_start_matches('~');
        if name.is_empty() {
            return Self::Unnamed;
        }

        if name.chars().count() <= 2 {
            return Self::ShortLoopVariable;
        }
        if is_constant_case(name) {
            return Self::ConstantCase;
        }
        if has_scope_prefix(name) || is_hungarian(name) {
            return Self::Prefixed;
        }
        if name.ends_with('_') && !name.trim_end_matches('_').is_empty() {
            return Self::Suffixed;
        }
        let core = name.trim_matches('_');
        if core.contains('_') || is_camel_case(core) {
            return Self::LongDescriptive;
        }
        if core.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            || is_capitalized_word(core)
        {
            return Self::SingleWord;
        }
        Self::Unnamed
    }
}

impl fmt::Display for NamingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamingBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| format!("unknown naming bucket '{s}'"))
    }
}

/// Hungarian-ish single-letter prefixes: `mName`, `kMax`, `pBuffer`, `bEnabled`.
const HUNGARIAN_PREFIXES: &[&str] = &[
    "m", "k", "p", "g", "s", "b", "n", "i", "u", "f", "c", "h", "l", "w", "sz", "dw", "lp", "str",
];

/// Scope prefixes followed by an underscore: `m_health`, `g_world`.
const SCOPE_PREFIXES: &[&str] = &["m_", "g_", "s_", "k_", "t_", "p_"];

fn is_constant_case(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn has_scope_prefix(name: &str) -> bool {
    SCOPE_PREFIXES
        .iter()
        .any(|p| name.strip_prefix(p).is_some_and(|rest| !rest.is_empty()))
}

fn is_hungarian(name: &str) -> bool {
    HUNGARIAN_PREFIXES.iter().any(|p| {
        name.strip_prefix(p).is_some_and(|rest| {
            let mut chars = rest.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
                && chars.next().is_some_and(|c| c.is_ascii_lowercase())
        })
    })
}

fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest: Vec<char> = chars.collect();
    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    let inner_upper = rest.iter().any(|c| c.is_ascii_uppercase());
    first.is_alphabetic() && has_lower && inner_upper
}

fn is_capitalized_word(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
