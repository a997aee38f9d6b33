//! Comment side channel.
//!
//! The tokenizer never emits comments as tokens. It records them here with
//! their line span, byte offsets, style, and whether code precedes them on
//! their first line. The index answers the one question the scanner asks:
//! "is there a comment immediately adjacent to the construct starting here?"

use serde::{Deserialize, Serialize};

use commentator_core::types::collections::FxHashMap;

use super::keywords::{is_decl_specifier, is_type_keyword};
use super::token::{Token, TokenKind};
use super::tokenizer::Tokenizer;

/// Syntactic form of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `///`, `//!`, `/** */`, `/*! */`
    Doc,
}

/// One comment, or one group of consecutive own-line line comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Text with comment markers removed and whitespace collapsed.
    pub text: String,
    pub style: CommentStyle,
    pub start_line: u32,
    pub end_line: u32,
    /// Byte offset of the opening marker.
    pub start: usize,
    /// Byte offset one past the closing marker.
    pub end: usize,
    /// Code precedes the comment on its first line.
    pub trailing: bool,
}

impl Comment {
    /// True when the cleaned text reads like commented-out code rather than
    /// prose (`// x = 3;`, `/* } */`).
    pub fn looks_like_code(&self) -> bool {
        looks_like_code(&self.text)
    }
}

const DIRECTIVES: &[&str] = &[
    "include", "define", "undef", "if", "ifdef", "ifndef", "elif", "else", "endif", "pragma",
];

/// Cleaned comment text that is really disabled code: a preprocessor
/// directive, or text ending in `;`, `{` or `}` whose tokens open like a
/// statement (`x = 3;`, `run(dt);`, `int n = 0;`, `if (ready) {`).
/// Prose that merely mentions operators is not code.
pub fn looks_like_code(text: &str) -> bool {
    let t = text.trim();
    if let Some(rest) = t.strip_prefix('#') {
        let word: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        return DIRECTIVES.contains(&word.as_str());
    }
    if !(t.ends_with(';') || t.ends_with('{') || t.ends_with('}')) {
        return false;
    }
    let lexed = Tokenizer::new(t).tokenize();
    opens_like_statement(&lexed.tokens)
}

fn opens_like_statement(tokens: &[Token<'_>]) -> bool {
    let text = |i: usize| tokens.get(i).map_or("", |t| t.text);
    let mut i = 0;
    while tokens
        .get(i)
        .is_some_and(|t| t.kind == TokenKind::Keyword && is_decl_specifier(t.text))
    {
        i += 1;
    }
    let Some(first) = tokens.get(i) else {
        return false;
    };
    match first.kind {
        TokenKind::Keyword if matches!(first.text, "if" | "for" | "while" | "switch") => text(i + 1) == "(",
        TokenKind::Operator if matches!(first.text, "++" | "--") => {
            tokens.get(i + 1).is_some_and(Token::is_identifier)
        }
        TokenKind::Keyword if is_type_keyword(first.text) => {
            let mut j = i + 1;
            while tokens.get(j).is_some_and(|t| t.kind == TokenKind::Keyword && is_type_keyword(t.text)) {
                j += 1;
            }
            while matches!(text(j), "*" | "&") {
                j += 1;
            }
            tokens.get(j).is_some_and(Token::is_identifier) && matches!(text(j + 1), "=" | ";" | "(" | "[" | "{" | ",")
        }
        TokenKind::Keyword => first.text == "return",
        TokenKind::Identifier => {
            let mut j = i + 1;
            while matches!(text(j), "." | "->" | "::") && tokens.get(j + 1).is_some_and(Token::is_identifier) {
                j += 2;
            }
            let next = text(j);
            next == "(" || next == "++" || next == "--" || is_assignment(next)
        }
        _ => false,
    }
}

fn is_assignment(op: &str) -> bool {
    matches!(op, "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>=")
}

/// Strip comment markers from raw comment text.
///
/// Returns `None` when nothing readable remains (`//`, `/*****/`, `// ----`).
pub fn clean_comment(raw: &str) -> Option<String> {
    let body = if let Some(rest) = raw.strip_prefix("//") {
        rest.trim_start_matches(['/', '!'])
    } else if let Some(rest) = raw.strip_prefix("/*") {
        let rest = rest.strip_suffix("*/").unwrap_or(rest);
        rest.trim_start_matches(['*', '!'])
    } else {
        raw
    };

    let mut words: Vec<&str> = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.trim_start_matches('*').trim();
        words.extend(line.split_whitespace());
    }
    let text = words.join(" ");
    if text.chars().any(|c| c.is_alphanumeric()) {
        Some(text)
    } else {
        None
    }
}

/// Classify raw comment text.
pub fn comment_style(raw: &str) -> CommentStyle {
    if raw.starts_with("///") || raw.starts_with("//!") {
        // `////` separators are plain line comments.
        if raw.starts_with("////") {
            CommentStyle::Line
        } else {
            CommentStyle::Doc
        }
    } else if raw.starts_with("//") {
        CommentStyle::Line
    } else if (raw.starts_with("/**") && !raw.starts_with("/**/")) || raw.starts_with("/*!") {
        CommentStyle::Doc
    } else {
        CommentStyle::Block
    }
}

/// All comments of one source unit, ordered by position, with line lookups.
#[derive(Debug, Default, Clone)]
pub struct CommentIndex {
    comments: Vec<Comment>,
    /// end_line -> own-line comment ending there.
    own_line_by_end: FxHashMap<u32, usize>,
    /// start_line -> trailing comment starting there.
    trailing_by_line: FxHashMap<u32, usize>,
}

impl CommentIndex {
    /// Build the index, merging consecutive own-line line comments into
    /// groups. Comments with no readable text are dropped.
    pub fn new(raw_comments: Vec<Comment>) -> Self {
        let mut comments: Vec<Comment> = Vec::with_capacity(raw_comments.len());
        for c in raw_comments {
            if let Some(prev) = comments.last_mut() {
                let groupable = !c.trailing
                    && !prev.trailing
                    && c.style != CommentStyle::Block
                    && prev.style == c.style
                    && prev.end_line + 1 == c.start_line;
                if groupable {
                    prev.text.push(' ');
                    prev.text.push_str(&c.text);
                    prev.end_line = c.end_line;
                    prev.end = c.end;
                    continue;
                }
            }
            comments.push(c);
        }

        let mut own_line_by_end = FxHashMap::default();
        let mut trailing_by_line = FxHashMap::default();
        for (i, c) in comments.iter().enumerate() {
            if c.trailing {
                trailing_by_line.entry(c.start_line).or_insert(i);
            } else {
                own_line_by_end.insert(c.end_line, i);
            }
        }

        Self {
            comments,
            own_line_by_end,
            trailing_by_line,
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    /// The comment immediately adjacent to a construct whose first token is
    /// at `line`/`offset`: an own-line comment ending on the previous line
    /// (or on the same line before the token), else a trailing comment on
    /// the construct's first line.
    pub fn adjacent(&self, line: u32, offset: usize) -> Option<&Comment> {
        if let Some(&i) = self.own_line_by_end.get(&line) {
            let c = &self.comments[i];
            if c.end <= offset {
                return Some(c);
            }
        }
        if line > 1 {
            if let Some(&i) = self.own_line_by_end.get(&(line - 1)) {
                return Some(&self.comments[i]);
            }
        }
        self.trailing_by_line
            .get(&line)
            .map(|&i| &self.comments[i])
            .filter(|c| c.start >= offset)
    }
}
