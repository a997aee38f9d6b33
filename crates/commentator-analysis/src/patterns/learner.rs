//! Pattern learner: turns commented constructs into template support.

use std::ops::AddAssign;

use crate::dictionary::Dictionary;
use crate::lexer::{looks_like_code, Tokenizer};
use crate::structure::{Construct, ConstructStream, ScanStats};

use super::key::PatternKey;
use super::table::{PatternTable, SeenAt};
use super::template::slot_comment;

/// Counters for one or more learned files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnStats {
    pub files: usize,
    pub constructs: usize,
    pub commented: usize,
    pub templates_recorded: usize,
    /// Comments that read like disabled code.
    pub skipped_code: usize,
    /// Comments with nothing left besides slots.
    pub skipped_slot_only: usize,
    /// Files that fell back to flat scanning.
    pub flat_files: usize,
}

impl AddAssign for LearnStats {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.constructs += other.constructs;
        self.commented += other.commented;
        self.templates_recorded += other.templates_recorded;
        self.skipped_code += other.skipped_code;
        self.skipped_slot_only += other.skipped_slot_only;
        self.flat_files += other.flat_files;
    }
}

/// Learns phrasing templates against a dictionary snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PatternLearner<'d> {
    dictionary: &'d Dictionary,
}

impl<'d> PatternLearner<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self { dictionary }
    }

    /// Record every commented construct of one file into a fresh table.
    /// `file_index` is the file's position in corpus walk order.
    pub fn learn_constructs(
        &self,
        file_index: u32,
        constructs: impl IntoIterator<Item = Construct>,
    ) -> (PatternTable, LearnStats) {
        let mut table = PatternTable::new();
        let mut stats = LearnStats {
            files: 1,
            ..Default::default()
        };
        for (ordinal, construct) in constructs.into_iter().enumerate() {
            stats.constructs += 1;
            let Some(comment) = construct.existing_comment.as_deref() else {
                continue;
            };
            stats.commented += 1;
            if looks_like_code(comment) {
                stats.skipped_code += 1;
                continue;
            }
            match slot_comment(comment, &construct, self.dictionary) {
                Some(template) => {
                    let seen = SeenAt::new(file_index, ordinal as u32);
                    table.record(PatternKey::of(&construct), template, seen);
                    stats.templates_recorded += 1;
                }
                None => stats.skipped_slot_only += 1,
            }
        }
        (table, stats)
    }

    /// Tokenize, scan and learn one source unit.
    pub fn learn_source(&self, file_index: u32, file: &str, source: &str) -> (PatternTable, LearnStats) {
        let lexed = Tokenizer::new(source).tokenize();
        let mut stream = ConstructStream::new(file, &lexed);
        let (table, mut stats) = self.learn_constructs(file_index, stream.by_ref());
        let (_, scan): (_, ScanStats) = stream.finish();
        if scan.flat_from_line.is_some() {
            stats.flat_files += 1;
        }
        (table, stats)
    }
}
