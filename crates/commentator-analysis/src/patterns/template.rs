//! Phrasing templates: slotting comments and instantiating templates.
//!
//! A template is comment text in which the construct's identifier became
//! `{name}`, literal values (or their dictionary meanings) became `{value}`,
//! and the identifier's dictionary meaning became `{meaning}`.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;
use regex::{NoExpand, Regex};

use crate::dictionary::Dictionary;
use crate::structure::Construct;

pub const NAME_SLOT: &str = "{name}";
pub const VALUE_SLOT: &str = "{value}";
pub const MEANING_SLOT: &str = "{meaning}";

fn numeric_literal_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:0[xX][0-9a-fA-F']+|0[bB][01']+|[0-9][0-9']*(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)[uUlLfFzZ]*\b",
        )
        .ok()
    })
    .as_ref()
}

/// Replace `needle` (ASCII case-insensitive) with `slot` wherever it occurs.
fn replace_phrase(text: &str, needle: &str, slot: &str) -> String {
    if needle.trim().is_empty() {
        return text.to_string();
    }
    match AhoCorasick::builder().ascii_case_insensitive(true).build([needle]) {
        Ok(ac) => ac.replace_all(text, &[slot]),
        Err(_) => text.to_string(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace whole-word occurrences of `word` (case-sensitive) with `slot`.
fn replace_word(text: &str, word: &str, slot: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (at, _) in text.match_indices(word) {
        let end = at + word.len();
        let joined_before = text[..at].chars().next_back().is_some_and(is_word_char);
        let joined_after = text[end..].chars().next().is_some_and(is_word_char);
        if joined_before || joined_after {
            continue;
        }
        out.push_str(&text[last..at]);
        out.push_str(slot);
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn an attached comment into a template for its construct.
///
/// Returns `None` when nothing but slots (and punctuation) would remain.
pub fn slot_comment(comment: &str, construct: &Construct, dictionary: &Dictionary) -> Option<String> {
    let mut text = comment.to_string();

    // Dictionary meanings first: they may contain the identifier or digits.
    if let Some(name) = construct.identifier() {
        if let Some(hit) = dictionary.lookup_identifier(name) {
            text = replace_phrase(&text, &hit.meaning, MEANING_SLOT);
        }
    }
    for literal in &construct.literals {
        if let Some(hit) = dictionary.lookup_literal(literal) {
            text = replace_phrase(&text, &hit.meaning, VALUE_SLOT);
        }
    }

    if let Some(name) = construct.identifier() {
        let bare = name.trim_start_matches('~');
        if !bare.is_empty() && bare.chars().all(|c| c.is_alphanumeric() || c == '_') {
            text = replace_word(&text, bare, NAME_SLOT);
        }
    }

    if let Some(re) = numeric_literal_re() {
        text = re.replace_all(&text, NoExpand(VALUE_SLOT)).into_owned();
    }

    let text = collapse_whitespace(&text);
    if text.is_empty() || is_slot_only(&text) {
        None
    } else {
        Some(text)
    }
}

/// True when removing slots leaves no readable word.
pub fn is_slot_only(template: &str) -> bool {
    let stripped = template
        .replace(NAME_SLOT, "")
        .replace(VALUE_SLOT, "")
        .replace(MEANING_SLOT, "");
    !stripped.chars().any(|c| c.is_alphanumeric())
}

/// De-duplication key: lowercase, collapsed whitespace, no trailing
/// punctuation.
pub fn normalize_for_dedup(template: &str) -> String {
    collapse_whitespace(&template.to_lowercase())
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!') || c.is_whitespace())
        .to_string()
}

/// Slot counts of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    pub name: usize,
    pub value: usize,
    pub meaning: usize,
}

pub fn slot_counts(template: &str) -> SlotCounts {
    SlotCounts {
        name: template.matches(NAME_SLOT).count(),
        value: template.matches(VALUE_SLOT).count(),
        meaning: template.matches(MEANING_SLOT).count(),
    }
}

/// A value available to fill `{value}`, and whether it came from the
/// dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillValue {
    pub text: String,
    pub from_dictionary: bool,
}

/// Everything a construct can offer to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotFill {
    pub name: Option<String>,
    /// Filled into `{value}` slots in order.
    pub values: Vec<FillValue>,
    pub meaning: Option<String>,
}

impl SlotFill {
    pub fn can_fill(&self, template: &str) -> bool {
        let counts = slot_counts(template);
        (counts.name == 0 || self.name.is_some())
            && (counts.meaning == 0 || self.meaning.is_some())
            && counts.value <= self.values.len()
    }
}

/// An instantiated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiated {
    pub text: String,
    /// A dictionary meaning was written into the text.
    pub used_dictionary: bool,
}

/// Fill every slot of `template`. `None` if some slot cannot be filled.
pub fn instantiate(template: &str, fill: &SlotFill) -> Option<Instantiated> {
    if !fill.can_fill(template) {
        return None;
    }
    let mut out = String::with_capacity(template.len() + 16);
    let mut used_dictionary = false;
    let mut values = fill.values.iter();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix(NAME_SLOT) {
            out.push_str(fill.name.as_deref()?);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(VALUE_SLOT) {
            let value = values.next()?;
            used_dictionary |= value.from_dictionary;
            out.push_str(&value.text);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(MEANING_SLOT) {
            out.push_str(fill.meaning.as_deref()?);
            used_dictionary = true;
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Some(Instantiated {
        text: out,
        used_dictionary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::scan_source;

    fn construct(src: &str) -> Construct {
        scan_source("t.cpp", src).constructs.remove(0)
    }

    #[test]
    fn identifier_and_numbers_become_slots() {
        let c = construct("int timeout = 30;");
        let t = slot_comment("timeout in seconds, default 30", &c, &Dictionary::new()).unwrap();
        assert_eq!(t, "{name} in seconds, default {value}");
    }

    #[test]
    fn identifier_replacement_is_whole_word() {
        let c = construct("int id;");
        let t = slot_comment("id of the player, not an idea", &c, &Dictionary::new()).unwrap();
        assert_eq!(t, "{name} of the player, not an idea");
    }

    #[test]
    fn identifier_next_to_underscore_is_not_a_word() {
        let c = construct("int hp;");
        let t = slot_comment("hp_max caps hp, HP shown above", &c, &Dictionary::new()).unwrap();
        assert_eq!(t, "hp_max caps {name}, HP shown above");
    }

    #[test]
    fn meaning_match_ignores_case_and_repeats() {
        let dict = Dictionary::from_entries([("hp", "Hit Points")]);
        let c = construct("int hp;");
        let once = slot_comment("hit points; more HIT POINTS", &c, &dict).unwrap();
        assert_eq!(once, "{meaning}; more {meaning}");
        assert_eq!(slot_comment("hit points; more HIT POINTS", &c, &dict).unwrap(), once);
    }

    #[test]
    fn dictionary_meanings_become_slots() {
        let dict = Dictionary::from_entries([("0xA000", "Terrain Height Base"), ("base", "Base address")]);
        let c = construct("int base = 0xA000;");
        let t = slot_comment("Base address, starts at terrain height base", &c, &dict).unwrap();
        assert_eq!(t, "{meaning}, starts at {value}");
        assert!(slot_comment("Base address: terrain height base", &c, &dict).is_none());
    }

    #[test]
    fn slot_only_comments_are_dropped() {
        let c = construct("int counter = 7;");
        assert!(slot_comment("counter", &c, &Dictionary::new()).is_none());
        assert!(slot_comment("7", &c, &Dictionary::new()).is_none());
        assert!(slot_comment("loop counter", &Construct { identifier: None, ..c }, &Dictionary::new()).is_some());
    }

    #[test]
    fn numbers_inside_words_are_left_alone() {
        let c = construct("int a;");
        let t = slot_comment("x86 3D coords, 16 bytes", &c, &Dictionary::new()).unwrap();
        assert_eq!(t, "x86 3D coords, {value} bytes");
    }

    #[test]
    fn dedup_normalization() {
        assert_eq!(normalize_for_dedup("Loop  counter."), "loop counter");
        assert_eq!(normalize_for_dedup("loop counter"), "loop counter");
        assert_eq!(normalize_for_dedup("Index: "), "index");
    }

    #[test]
    fn instantiate_fills_in_order() {
        let fill = SlotFill {
            name: Some("base".into()),
            values: vec![
                FillValue { text: "Terrain Height Base".into(), from_dictionary: true },
                FillValue { text: "4".into(), from_dictionary: false },
            ],
            meaning: None,
        };
        let out = instantiate("{name} starts at {value} step {value}", &fill).unwrap();
        assert_eq!(out.text, "base starts at Terrain Height Base step 4");
        assert!(out.used_dictionary);
    }

    #[test]
    fn instantiate_fails_on_missing_slot_values() {
        let fill = SlotFill {
            name: Some("i".into()),
            ..Default::default()
        };
        assert!(instantiate("{name} is {value}", &fill).is_none());
        assert!(instantiate("{meaning}", &fill).is_none());
        let out = instantiate("index {name} of {set}", &fill).unwrap();
        assert_eq!(out.text, "index i of {set}");
        assert!(!out.used_dictionary);
    }
}
