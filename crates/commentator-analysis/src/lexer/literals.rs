//! Numeric literal normalization.
//!
//! Dictionary keys and construct facts share one normal form so that
//! `0xA000`, `0xa000u` and `0xA'000` all resolve to the same entry.
//! Anything that does not parse (overflow, user-defined suffixes) keeps its
//! raw text as the key and is treated as an opaque string.

use serde::{Deserialize, Serialize};

/// A numeric literal as written plus its lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralValue {
    /// Source text exactly as written.
    pub raw: String,
    /// Normalized form used for dictionary lookup.
    pub key: String,
    /// False when normalization failed and `key == raw`.
    pub well_formed: bool,
}

impl LiteralValue {
    pub fn new(raw: &str) -> Self {
        match normalize_numeric(raw) {
            Some(key) => Self {
                raw: raw.to_string(),
                key,
                well_formed: true,
            },
            None => Self {
                raw: raw.to_string(),
                key: raw.to_string(),
                well_formed: false,
            },
        }
    }
}

const INTEGER_SUFFIXES: &[&str] = &[
    "ull", "llu", "ul", "lu", "ll", "uz", "zu", "u", "l", "z",
];

/// True if `text` starts like a numeric literal (`7`, `0x1F`, `.5`).
pub fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Normalize a numeric literal. Returns `None` for malformed input.
///
/// Integers lose digit separators and integer suffixes and are lowercased;
/// hex keeps its `0x` prefix and digits as written (`0xA000` -> `0xa000`).
/// Floats lose separators and an `f`/`l` suffix.
pub fn normalize_numeric(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '\'')
        .collect::<String>()
        .to_ascii_lowercase();
    if !looks_numeric(&cleaned) {
        return None;
    }

    if let Some(hex) = cleaned.strip_prefix("0x") {
        if hex.contains('.') || hex.contains('p') {
            return normalize_float(&cleaned);
        }
        let digits = strip_integer_suffix(hex);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(digits, 16).ok()?;
        return Some(format!("0x{digits}"));
    }

    if let Some(bin) = cleaned.strip_prefix("0b") {
        let digits = strip_integer_suffix(bin);
        if digits.is_empty() || !digits.chars().all(|c| c == '0' || c == '1') {
            return None;
        }
        u64::from_str_radix(digits, 2).ok()?;
        return Some(format!("0b{digits}"));
    }

    if cleaned.contains('.') || cleaned.contains('e') {
        return normalize_float(&cleaned);
    }

    let digits = strip_integer_suffix(&cleaned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        // Octal.
        if !digits.chars().all(|c| ('0'..='7').contains(&c)) {
            return None;
        }
        u64::from_str_radix(&digits[1..], 8).ok()?;
    } else {
        digits.parse::<u64>().ok()?;
    }
    Some(digits.to_string())
}

fn strip_integer_suffix(text: &str) -> &str {
    for suffix in INTEGER_SUFFIXES {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return stripped;
        }
    }
    text
}

fn normalize_float(cleaned: &str) -> Option<String> {
    let body = if cleaned.starts_with("0x") {
        cleaned
    } else {
        cleaned
            .strip_suffix('f')
            .or_else(|| cleaned.strip_suffix('l'))
            .unwrap_or(cleaned)
    };
    let valid = if let Some(hex) = body.strip_prefix("0x") {
        hex.chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, '.' | 'p' | '+' | '-'))
    } else {
        body.parse::<f64>().is_ok_and(f64::is_finite)
    };
    valid.then(|| body.to_string())
}
