//! Construct: a unit of source eligible for a comment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use commentator_core::types::collections::SmallVec2;

use super::naming::NamingBucket;
use super::scope::ScopeId;
use crate::lexer::LiteralValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructKind {
    VariableDeclaration,
    FunctionDefinition,
    Loop,
    Conditional,
}

impl ConstructKind {
    pub const ALL: [ConstructKind; 4] = [
        Self::VariableDeclaration,
        Self::FunctionDefinition,
        Self::Loop,
        Self::Conditional,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::VariableDeclaration => "variable-declaration",
            Self::FunctionDefinition => "function-definition",
            Self::Loop => "loop",
            Self::Conditional => "conditional",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConstructKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown construct kind '{s}'"))
    }
}

/// Bitwise, shift and modulo operators seen in a construct header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOperator {
    And,
    Or,
    Xor,
    Not,
    ShiftLeft,
    ShiftRight,
    Modulo,
}

impl BitOperator {
    pub fn from_token(text: &str) -> Option<Self> {
        Some(match text {
            "&" | "&=" => Self::And,
            "|" | "|=" => Self::Or,
            "^" | "^=" => Self::Xor,
            "~" => Self::Not,
            "<<" | "<<=" => Self::ShiftLeft,
            ">>" | ">>=" => Self::ShiftRight,
            "%" | "%=" => Self::Modulo,
            _ => return None,
        })
    }

    /// Plain-language description used by structural fallback sentences.
    pub fn description(&self) -> &'static str {
        match self {
            Self::And => "Bitwise MASK",
            Self::Or => "Bitwise MERGE",
            Self::Xor => "Bitwise TOGGLE",
            Self::Not => "Bitwise INVERT",
            Self::ShiftLeft => "Bitwise SHIFT LEFT",
            Self::ShiftRight => "Bitwise SHIFT RIGHT",
            Self::Modulo => "Modulo / Wrap Around",
        }
    }
}

/// File and line span of a construct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path relative to the scanned root, `/`-separated.
    pub file: String,
    pub line_start: u32,
    pub line_end: u32,
    pub column: u32,
}

/// Facts beyond the identifier and literals, gathered from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructFacts {
    /// Declared type (variables) or return type (functions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_text: Option<String>,
    /// `for`, `while`, `do`, `if`, `switch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<BitOperator>,
}

impl ConstructFacts {
    pub fn record_operator(&mut self, op: BitOperator) {
        if !self.operators.contains(&op) {
            self.operators.push(op);
        }
    }

    /// The declared type names an unsigned integer (`uint8_t`, `unsigned char`,
    /// `u16`, `DWORD`...).
    pub fn is_unsigned_type(&self) -> bool {
        let Some(ty) = self.type_text.as_deref() else {
            return false;
        };
        ty.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|word| {
                word == "unsigned"
                    || word == "size_t"
                    || word == "BYTE"
                    || word == "WORD"
                    || word == "DWORD"
                    || (word.starts_with("uint") && !word.starts_with("uintptr"))
                    || (word.len() <= 3
                        && word.starts_with('u')
                        && word[1..].chars().all(|c| c.is_ascii_digit())
                        && word.len() > 1)
            })
    }
}

/// A construct detected by the structural scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construct {
    pub kind: ConstructKind,
    /// Enclosing scope in the file's `ScopeTree`.
    pub scope: ScopeId,
    pub location: SourceLocation,
    pub identifier: Option<String>,
    /// `Class::method` for out-of-class member definitions.
    pub qualified_name: Option<String>,
    /// Numeric literals referenced in the header, in source order.
    pub literals: SmallVec2<LiteralValue>,
    /// Adjacent comment already present in the source.
    pub existing_comment: Option<String>,
    pub bucket: NamingBucket,
    pub facts: ConstructFacts,
}

impl Construct {
    pub fn is_commented(&self) -> bool {
        self.existing_comment.is_some()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in ConstructKind::ALL {
            assert_eq!(kind.name().parse::<ConstructKind>().unwrap(), kind);
        }
        assert_eq!(
            serde_json::to_string(&ConstructKind::VariableDeclaration).unwrap(),
            "\"variable-declaration\""
        );
    }

    #[test]
    fn operators_from_tokens() {
        assert_eq!(BitOperator::from_token("&"), Some(BitOperator::And));
        assert_eq!(BitOperator::from_token("<<="), Some(BitOperator::ShiftLeft));
        assert_eq!(BitOperator::from_token("&&"), None);
        assert_eq!(BitOperator::Modulo.description(), "Modulo / Wrap Around");
    }

    #[test]
    fn unsigned_type_detection() {
        let facts = |ty: &str| ConstructFacts {
            type_text: Some(ty.to_string()),
            ..Default::default()
        };
        assert!(facts("uint8_t").is_unsigned_type());
        assert!(facts("unsigned char").is_unsigned_type());
        assert!(facts("std::uint32_t").is_unsigned_type());
        assert!(facts("u16").is_unsigned_type());
        assert!(!facts("int").is_unsigned_type());
        assert!(!facts("uintptr_t").is_unsigned_type());
        assert!(!facts("u").is_unsigned_type());
    }

    #[test]
    fn operators_are_recorded_once() {
        let mut facts = ConstructFacts::default();
        facts.record_operator(BitOperator::And);
        facts.record_operator(BitOperator::And);
        assert_eq!(facts.operators, vec![BitOperator::And]);
    }
}
