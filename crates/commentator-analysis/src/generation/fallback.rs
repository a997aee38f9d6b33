//! Sentences built without a learned template.

use crate::structure::{BitOperator, Construct, ConstructKind};

/// Phrase dictionary meanings for a construct kind.
pub fn dictionary_sentence(kind: ConstructKind, meanings: &[String]) -> String {
    let joined = meanings.join(", ");
    match kind {
        ConstructKind::VariableDeclaration => joined,
        ConstructKind::Loop => format!("Iterates using {joined}"),
        ConstructKind::Conditional => format!("Checks {joined}"),
        ConstructKind::FunctionDefinition => format!("Handles {joined}"),
    }
}

/// Operators in the order their descriptions are preferred.
const OPERATOR_PRIORITY: [BitOperator; 7] = [
    BitOperator::And,
    BitOperator::Or,
    BitOperator::ShiftLeft,
    BitOperator::ShiftRight,
    BitOperator::Modulo,
    BitOperator::Xor,
    BitOperator::Not,
];

/// Heuristic sentence from structure alone, if any rule applies.
pub fn structural_sentence(construct: &Construct) -> Option<String> {
    if construct.kind == ConstructKind::VariableDeclaration {
        if let Some(name) = construct.identifier() {
            let lower = name.to_lowercase();
            if lower.contains("flags") || lower.contains("mask") {
                return Some("Bitmask configuration".to_string());
            }
            if construct.facts.is_array && construct.facts.is_unsigned_type() {
                return Some(format!("Buffer for {name}"));
            }
        }
    }
    OPERATOR_PRIORITY
        .iter()
        .find(|op| construct.facts.operators.contains(op))
        .map(|op| format!("{} operation", op.description()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::scan_source;

    fn first(src: &str) -> Construct {
        scan_source("t.cpp", src).constructs.remove(0)
    }

    #[test]
    fn sentences_per_kind() {
        let m = vec!["Terrain Height Base".to_string()];
        assert_eq!(dictionary_sentence(ConstructKind::VariableDeclaration, &m), "Terrain Height Base");
        assert_eq!(dictionary_sentence(ConstructKind::Loop, &m), "Iterates using Terrain Height Base");
        assert_eq!(dictionary_sentence(ConstructKind::Conditional, &m), "Checks Terrain Height Base");
        assert_eq!(dictionary_sentence(ConstructKind::FunctionDefinition, &m), "Handles Terrain Height Base");
        let two = vec!["A".to_string(), "B".to_string()];
        assert_eq!(dictionary_sentence(ConstructKind::VariableDeclaration, &two), "A, B");
    }

    #[test]
    fn bitmask_names() {
        assert_eq!(
            structural_sentence(&first("int renderFlags = 0;")).as_deref(),
            Some("Bitmask configuration")
        );
    }

    #[test]
    fn unsigned_buffers() {
        assert_eq!(
            structural_sentence(&first("uint8_t scratch[64];")).as_deref(),
            Some("Buffer for scratch")
        );
        assert!(structural_sentence(&first("int scratch[64];")).is_none());
    }

    #[test]
    fn operators_describe_the_operation() {
        assert_eq!(
            structural_sentence(&first("int low = value & 0xFF;")).as_deref(),
            Some("Bitwise MASK operation")
        );
        assert_eq!(
            structural_sentence(&first("int slot = index % 16;")).as_deref(),
            Some("Modulo / Wrap Around operation")
        );
    }
}
