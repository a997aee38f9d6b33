//! Suggestion engine: fuses pattern and dictionary signals per construct.

use std::ops::AddAssign;

use commentator_core::config::FusionMode;
use commentator_core::types::collections::SmallVec4;

use crate::dictionary::{Dictionary, DictionaryHit, HitSource, MatchKind};
use crate::patterns::{instantiate, Instantiated, PatternEntry, PatternKey, PatternModel};
use crate::patterns::{FillValue, SlotFill};
use crate::structure::Construct;

use super::confidence::{clamp_unit, dictionary_bonus, pattern_score, GenerationSettings};
use super::fallback::{dictionary_sentence, structural_sentence};
use super::suggestion::{suggestion_id, PatternHit, Provenance, Signal, Suggestion};

/// What happened to one construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Suggested(Suggestion),
    /// Already carries an adjacent comment.
    PreCommented,
    /// Neither patterns nor dictionary (nor heuristics, if enabled) apply.
    NoSignal,
}

impl Outcome {
    pub fn into_suggestion(self) -> Option<Suggestion> {
        match self {
            Self::Suggested(s) => Some(s),
            _ => None,
        }
    }
}

/// Counters for one or more suggestion runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub constructs: usize,
    pub pre_commented: usize,
    pub no_signal: usize,
    pub suggested: usize,
    pub from_patterns: usize,
    pub from_dictionary: usize,
    pub structural_only: usize,
}

impl GenerationStats {
    pub fn record(&mut self, outcome: &Outcome) {
        self.constructs += 1;
        match outcome {
            Outcome::PreCommented => self.pre_commented += 1,
            Outcome::NoSignal => self.no_signal += 1,
            Outcome::Suggested(s) => {
                self.suggested += 1;
                if s.provenance.has(Signal::PatternHit) {
                    self.from_patterns += 1;
                }
                if s.provenance.has(Signal::DictionaryHit) {
                    self.from_dictionary += 1;
                }
                if s.provenance.is_structural_only() {
                    self.structural_only += 1;
                }
            }
        }
    }
}

impl AddAssign for GenerationStats {
    fn add_assign(&mut self, other: Self) {
        self.constructs += other.constructs;
        self.pre_commented += other.pre_commented;
        self.no_signal += other.no_signal;
        self.suggested += other.suggested;
        self.from_patterns += other.from_patterns;
        self.from_dictionary += other.from_dictionary;
        self.structural_only += other.structural_only;
    }
}

/// Template chosen for a construct, already instantiated.
struct PatternChoice<'m> {
    key: PatternKey,
    entry: &'m PatternEntry,
    key_support: u64,
    filled: Instantiated,
}

/// Read-only over the model and dictionary; safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine<'a> {
    model: &'a PatternModel,
    dictionary: &'a Dictionary,
    settings: GenerationSettings,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(model: &'a PatternModel, dictionary: &'a Dictionary, settings: GenerationSettings) -> Self {
        Self {
            model,
            dictionary,
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn suggest(&self, construct: &Construct) -> Option<Suggestion> {
        self.evaluate(construct).into_suggestion()
    }

    /// Lazily map constructs to suggestions, preserving order.
    pub fn suggest_all<I>(&self, constructs: I) -> impl Iterator<Item = Suggestion> + 'a
    where
        I: IntoIterator<Item = Construct>,
        I::IntoIter: 'a,
    {
        let engine = *self;
        constructs
            .into_iter()
            .filter_map(move |c| engine.suggest(&c))
    }

    /// Decide what to suggest for one construct.
    pub fn evaluate(&self, construct: &Construct) -> Outcome {
        if construct.is_commented() {
            return Outcome::PreCommented;
        }

        let hits = self.dictionary_hits(construct);
        let fill = slot_fill(construct, &hits);
        let pattern = self.choose_pattern(construct, &fill);

        let suggestion = match self.settings.fusion_mode {
            FusionMode::Fuse => match pattern {
                Some(p) => Some(self.from_pattern(construct, p, &hits, true)),
                None => self.from_dictionary(construct, &hits),
            },
            FusionMode::PatternFirst => match pattern {
                Some(p) => {
                    let chosen = self.from_pattern(construct, p, &hits, false);
                    Some(self.credit_dictionary(chosen, &hits))
                }
                None => self.from_dictionary(construct, &hits),
            },
            FusionMode::DictionaryFirst => match (self.from_dictionary(construct, &hits), pattern) {
                (Some(chosen), Some(p)) => Some(self.credit_pattern(chosen, &p)),
                (Some(chosen), None) => Some(chosen),
                (None, p) => p.map(|p| self.from_pattern(construct, p, &hits, false)),
            },
        };

        match suggestion.or_else(|| self.from_structure(construct)) {
            Some(s) => Outcome::Suggested(s),
            None => Outcome::NoSignal,
        }
    }

    /// Identifier hit (exact, else fuzzy) then literal hits, de-duplicated.
    fn dictionary_hits(&self, construct: &Construct) -> SmallVec4<DictionaryHit> {
        let mut hits: SmallVec4<DictionaryHit> = SmallVec4::new();
        if let Some(name) = construct.identifier() {
            if let Some(hit) = self.dictionary.resolve_identifier(name) {
                hits.push(hit);
            }
        }
        for literal in &construct.literals {
            if let Some(hit) = self.dictionary.lookup_literal(literal) {
                if !hits.iter().any(|h| h.source == HitSource::Literal && h.key == hit.key) {
                    hits.push(hit);
                }
            }
        }
        hits
    }

    /// Highest-support template under the construct's key whose slots can
    /// all be filled.
    fn choose_pattern(&self, construct: &Construct, fill: &SlotFill) -> Option<PatternChoice<'a>> {
        let key = PatternKey::of(construct);
        let entries = self.model.get(key);
        let key_support = self.model.total_support(key);
        entries.iter().find_map(|entry| {
            instantiate(&entry.template, fill).map(|filled| PatternChoice {
                key,
                entry,
                key_support,
                filled,
            })
        })
    }

    /// `credit_all_hits`: every dictionary hit adds to confidence (fuse);
    /// otherwise only hits whose meaning was written into the text count.
    fn from_pattern(
        &self,
        construct: &Construct,
        choice: PatternChoice<'_>,
        hits: &[DictionaryHit],
        credit_all_hits: bool,
    ) -> Suggestion {
        let credited: Vec<DictionaryHit> = if credit_all_hits || choice.filled.used_dictionary {
            hits.to_vec()
        } else {
            Vec::new()
        };
        let (exact, fuzzy) = hit_kinds(&credited);
        let score = pattern_score(choice.entry.support, choice.key_support, &self.settings)
            + dictionary_bonus(exact, fuzzy, &self.settings);

        let mut signals = vec![Signal::PatternHit];
        if !credited.is_empty() {
            signals.push(Signal::DictionaryHit);
        }
        let pattern = pattern_hit(&choice);
        Suggestion {
            id: suggestion_id(construct),
            construct: construct.clone(),
            text: choice.filled.text,
            confidence: clamp_unit(score),
            provenance: Provenance {
                signals,
                pattern: Some(pattern),
                dictionary: credited,
            },
        }
    }

    /// Override modes keep the chosen text but never score below the
    /// dictionary signal on its own.
    fn credit_dictionary(&self, mut chosen: Suggestion, hits: &[DictionaryHit]) -> Suggestion {
        if hits.is_empty() {
            return chosen;
        }
        let (exact, fuzzy) = hit_kinds(hits);
        let alone = clamp_unit(dictionary_bonus(exact, fuzzy, &self.settings));
        chosen.confidence = chosen.confidence.max(alone);
        if !chosen.provenance.has(Signal::DictionaryHit) {
            chosen.provenance.signals.push(Signal::DictionaryHit);
        }
        chosen.provenance.dictionary = hits.to_vec();
        chosen
    }

    /// Same as `credit_dictionary`, for a usable pattern beside a
    /// dictionary sentence.
    fn credit_pattern(&self, mut chosen: Suggestion, choice: &PatternChoice<'_>) -> Suggestion {
        let alone = clamp_unit(pattern_score(choice.entry.support, choice.key_support, &self.settings));
        chosen.confidence = chosen.confidence.max(alone);
        if !chosen.provenance.has(Signal::PatternHit) {
            chosen.provenance.signals.insert(0, Signal::PatternHit);
        }
        chosen.provenance.pattern = Some(pattern_hit(choice));
        chosen
    }

    fn from_dictionary(&self, construct: &Construct, hits: &[DictionaryHit]) -> Option<Suggestion> {
        if hits.is_empty() {
            return None;
        }
        let mut meanings: Vec<String> = Vec::with_capacity(hits.len());
        for hit in hits {
            let rendered = hit.rendered();
            if !meanings.contains(&rendered) {
                meanings.push(rendered);
            }
        }
        let (exact, fuzzy) = hit_kinds(hits);
        Some(Suggestion {
            id: suggestion_id(construct),
            construct: construct.clone(),
            text: dictionary_sentence(construct.kind, &meanings),
            confidence: clamp_unit(dictionary_bonus(exact, fuzzy, &self.settings)),
            provenance: Provenance {
                signals: vec![Signal::DictionaryHit],
                pattern: None,
                dictionary: hits.to_vec(),
            },
        })
    }

    fn from_structure(&self, construct: &Construct) -> Option<Suggestion> {
        if !self.settings.structural_fallback {
            return None;
        }
        let text = structural_sentence(construct)?;
        Some(Suggestion {
            id: suggestion_id(construct),
            construct: construct.clone(),
            text,
            confidence: clamp_unit(self.settings.structural_confidence),
            provenance: Provenance {
                signals: vec![Signal::StructuralOnly],
                ..Default::default()
            },
        })
    }
}

fn pattern_hit(choice: &PatternChoice<'_>) -> PatternHit {
    PatternHit {
        key: choice.key.to_string(),
        template: choice.entry.template.clone(),
        support: choice.entry.support,
        key_support: choice.key_support,
    }
}

fn hit_kinds(hits: &[DictionaryHit]) -> (bool, bool) {
    (
        hits.iter().any(|h| h.kind == MatchKind::Exact),
        hits.iter().any(|h| h.kind == MatchKind::Fuzzy),
    )
}

/// Slot values a construct offers: its identifier, each literal (as its
/// dictionary meaning when known), and the identifier's meaning (falling
/// back to the first literal meaning).
fn slot_fill(construct: &Construct, hits: &[DictionaryHit]) -> SlotFill {
    let values = construct
        .literals
        .iter()
        .map(|literal| {
            match hits
                .iter()
                .find(|h| h.source == HitSource::Literal && h.key == literal.key)
            {
                Some(hit) => FillValue {
                    text: hit.meaning.clone(),
                    from_dictionary: true,
                },
                None => FillValue {
                    text: literal.raw.clone(),
                    from_dictionary: false,
                },
            }
        })
        .collect();
    let meaning = hits
        .iter()
        .find(|h| h.source == HitSource::Identifier)
        .or_else(|| hits.iter().find(|h| h.source == HitSource::Literal))
        .map(DictionaryHit::rendered);
    SlotFill {
        name: construct.identifier().map(str::to_string),
        values,
        meaning,
    }
}
