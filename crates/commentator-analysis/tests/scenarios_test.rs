//! End-to-end behaviour on small, hand-checked inputs.

use commentator_analysis::dictionary::Dictionary;
use commentator_analysis::generation::{GenerationSettings, Signal, SuggestionEngine};
use commentator_analysis::patterns::{PatternKey, PatternLearner, PatternModel};
use commentator_analysis::pipeline::suggest_source;
use commentator_analysis::structure::{scan_source, ConstructKind, NamingBucket};

#[test]
fn magic_value_from_dictionary_without_patterns() {
    let dict = Dictionary::from_entries([("0xA000", "Terrain Height Base")]);
    let model = PatternModel::empty();
    let engine = SuggestionEngine::new(&model, &dict, GenerationSettings::default());

    let (suggestions, _) = suggest_source(&engine, "terrain.cpp", "int base = 0xA000;\n");
    assert_eq!(suggestions.len(), 1);
    let s = &suggestions[0];
    assert_eq!(s.text, "Terrain Height Base");
    assert!((s.confidence - 0.4).abs() < 1e-9);
    assert_eq!(s.provenance.signals, vec![Signal::DictionaryHit]);
    assert!(s.provenance.pattern.is_none());
}

#[test]
fn pre_commented_declaration_gets_nothing() {
    let dict = Dictionary::from_entries([("player_id", "Unique Entity ID")]);
    let model = PatternModel::empty();
    let engine = SuggestionEngine::new(&model, &dict, GenerationSettings::default());

    let (suggestions, stats) = suggest_source(&engine, "player.cpp", "int player_id; // legacy id\n");
    assert!(suggestions.is_empty());
    assert_eq!(stats.pre_commented, 1);
}

#[test]
fn learned_loop_counter_phrase_is_reused() {
    let corpus = "\
// loop counter
int i;

// loop counter
int j;

// loop counter
int k;

// loop counter
int n;

// loop counter
int x;
";
    let dict = Dictionary::new();
    let (table, stats) = PatternLearner::new(&dict).learn_source(0, "corpus.cpp", corpus);
    assert_eq!(stats.templates_recorded, 5);
    let model = table.finalize(8, 1);

    let key = PatternKey::new(ConstructKind::VariableDeclaration, NamingBucket::ShortLoopVariable);
    let entries = model.get(key);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].template, "loop counter");
    assert_eq!(entries[0].support, 5);
    assert_eq!(model.key_count(), 1);

    let engine = SuggestionEngine::new(&model, &dict, GenerationSettings::default());
    let (suggestions, _) = suggest_source(&engine, "elsewhere.cpp", "int i;\n");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].text, "loop counter");
    assert_eq!(suggestions[0].provenance.signals, vec![Signal::PatternHit]);
}

#[test]
fn unmatched_brace_keeps_earlier_constructs() {
    let src = "\
int before = 1;
void setup() {
    int local = 2;
}
}
int after = 3;
";
    let scan = scan_source("broken.cpp", src);
    let names: Vec<_> = scan.constructs.iter().map(|c| c.identifier()).collect();
    assert_eq!(names, vec![Some("before"), Some("setup"), Some("local"), Some("after")]);
    assert_eq!(scan.stats.unmatched_closings, 1);
    assert_eq!(scan.stats.flat_from_line, Some(5));
}
