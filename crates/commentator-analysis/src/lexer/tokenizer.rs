//! Hand-written C++ tokenizer.
//!
//! Works on bytes. Every byte >= 0x80 is treated as an identifier byte, so
//! token boundaries always fall on ASCII characters and slicing the `&str`
//! source is always valid.

use super::comments::{clean_comment, comment_style, Comment, CommentIndex};
use super::keywords::is_keyword;
use super::token::{Token, TokenKind};

/// Multi-character operators, longest first.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "<=>", "->*", "...", "::", "->", "++", "--", "<<", ">>", "<=", ">=", "==",
    "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ".*",
];

/// Prefixes that may start a raw string literal (`R"(...)"`).
const RAW_STRING_PREFIXES: &[&str] = &["R", "u8R", "uR", "UR", "LR"];

/// Encoding prefixes of ordinary string and char literals.
const ENCODING_PREFIXES: &[&str] = &["u8", "u", "U", "L"];

/// Output of the lexing pass for one source unit.
#[derive(Debug, Default)]
pub struct LexedSource<'a> {
    pub tokens: Vec<Token<'a>>,
    pub comments: CommentIndex,
    /// Number of preprocessor directive lines skipped.
    pub directives: usize,
    /// Total lines in the source.
    pub lines: u32,
}

/// Single-pass tokenizer over one source unit.
pub struct Tokenizer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    /// Line of the most recent token, used to mark trailing comments.
    last_token_line: u32,
    tokens: Vec<Token<'a>>,
    comments: Vec<Comment>,
    directives: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            last_token_line: 0,
            tokens: Vec::with_capacity(src.len() / 4),
            comments: Vec::new(),
            directives: 0,
        }
    }

    /// Tokenize the whole source. Never fails: unterminated literals and
    /// comments run to end of input.
    pub fn tokenize(mut self) -> LexedSource<'a> {
        let mut at_line_start = true;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'\n' => {
                    self.newline();
                    at_line_start = true;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'#' if at_line_start => {
                    self.skip_directive();
                    at_line_start = true;
                }
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
                _ => {
                    at_line_start = false;
                    self.token();
                }
            }
        }
        let lines = self.line;
        LexedSource {
            tokens: self.tokens,
            comments: CommentIndex::new(self.comments),
            directives: self.directives,
            lines,
        }
    }

    #[inline]
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    #[inline]
    fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.line_start = self.pos;
    }

    /// Advance over `[from, to)`, counting newlines.
    fn advance_to(&mut self, to: usize) {
        let to = to.min(self.bytes.len());
        while self.pos < to {
            if self.bytes[self.pos] == b'\n' {
                self.newline();
            } else {
                self.pos += 1;
            }
        }
    }

    fn skip_directive(&mut self) {
        self.directives += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' if self.peek(1) == Some(b'\n') => {
                    self.pos += 1;
                    self.newline();
                }
                b'\\' if self.peek(1) == Some(b'\r') && self.peek(2) == Some(b'\n') => {
                    self.pos += 2;
                    self.newline();
                }
                b'\n' => return,
                b'/' if self.peek(1) == Some(b'*') => {
                    // A block comment may carry the directive onto later lines.
                    let end = self.find(b"*/", self.pos + 2).map_or(self.bytes.len(), |e| e + 2);
                    self.advance_to(end);
                }
                b'/' if self.peek(1) == Some(b'/') => {
                    let end = self.find(b"\n", self.pos).unwrap_or(self.bytes.len());
                    self.advance_to(end);
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        if from >= self.bytes.len() {
            return None;
        }
        self.bytes[from..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| p + from)
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let start_line = self.line;
        let end = self.find(b"\n", start).unwrap_or(self.bytes.len());
        self.pos = end;
        let raw = self.src[start..end].trim_end_matches('\r');
        self.push_comment(raw, start, end, start_line, start_line);
    }

    fn block_comment(&mut self) {
        let start = self.pos;
        let start_line = self.line;
        let end = self.find(b"*/", start + 2).map_or(self.bytes.len(), |e| e + 2);
        self.advance_to(end);
        let raw = &self.src[start..end];
        self.push_comment(raw, start, end, start_line, self.line);
    }

    fn push_comment(&mut self, raw: &str, start: usize, end: usize, start_line: u32, end_line: u32) {
        let Some(text) = clean_comment(raw) else {
            return;
        };
        self.comments.push(Comment {
            text,
            style: comment_style(raw),
            start_line,
            end_line,
            start,
            end,
            trailing: self.last_token_line == start_line,
        });
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: u32, column: u32) {
        self.tokens.push(Token {
            kind,
            text: &self.src[start..self.pos],
            line,
            column,
            offset: start,
        });
        self.last_token_line = line;
    }

    fn token(&mut self) {
        let start = self.pos;
        let line = self.line;
        let column = (start - self.line_start) as u32 + 1;
        let b = self.bytes[start];

        if is_ident_start(b) {
            self.pos += 1;
            while self.pos < self.bytes.len() && is_ident_continue(self.bytes[self.pos]) {
                self.pos += 1;
            }
            let word = &self.src[start..self.pos];
            match self.peek(0) {
                Some(b'"') if RAW_STRING_PREFIXES.contains(&word) => {
                    self.raw_string();
                    self.push(TokenKind::StringLiteral, start, line, column);
                }
                Some(q @ (b'"' | b'\'')) if ENCODING_PREFIXES.contains(&word) => {
                    self.quoted(q);
                    let kind = if q == b'"' {
                        TokenKind::StringLiteral
                    } else {
                        TokenKind::CharLiteral
                    };
                    self.push(kind, start, line, column);
                }
                _ => {
                    let kind = if is_keyword(word) {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Identifier
                    };
                    self.push(kind, start, line, column);
                }
            }
            return;
        }

        if b.is_ascii_digit() || (b == b'.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
            self.number();
            self.push(TokenKind::Number, start, line, column);
            return;
        }

        match b {
            b'"' => {
                self.quoted(b'"');
                self.push(TokenKind::StringLiteral, start, line, column);
            }
            b'\'' => {
                self.quoted(b'\'');
                self.push(TokenKind::CharLiteral, start, line, column);
            }
            b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b',' => {
                self.pos += 1;
                self.push(TokenKind::Punctuation, start, line, column);
            }
            _ => {
                let rest = &self.bytes[start..];
                let len = OPERATORS
                    .iter()
                    .find(|op| rest.starts_with(op.as_bytes()))
                    .map_or(1, |op| op.len());
                self.pos += len;
                if b.is_ascii_punctuation() {
                    self.push(TokenKind::Operator, start, line, column);
                }
            }
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let is_hex = self.bytes[start] == b'0' && matches!(self.peek(0), Some(b'x' | b'X'));
        while let Some(c) = self.peek(0) {
            let prev = self.bytes[self.pos - 1].to_ascii_lowercase();
            let exponent_sign = matches!(c, b'+' | b'-')
                && ((!is_hex && prev == b'e') || (is_hex && prev == b'p'));
            let separator = c == b'\'' && self.peek(1).is_some_and(|n| n.is_ascii_alphanumeric());
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || exponent_sign || separator {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Consume a quoted literal starting at the opening quote. Stops at the
    /// closing quote or an unescaped newline.
    fn quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            match c {
                b'\\' => {
                    if self.peek(1) == Some(b'\n') {
                        self.pos += 1;
                        self.newline();
                    } else {
                        self.pos += 2;
                    }
                }
                b'\n' => return,
                _ if c == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Consume `"delim( ... )delim"` starting at the opening quote.
    fn raw_string(&mut self) {
        let open = self.pos;
        let Some(paren) = self.bytes[open..].iter().position(|&c| c == b'(').map(|p| p + open)
        else {
            self.quoted(b'"');
            return;
        };
        let delim = &self.bytes[open + 1..paren];
        if delim.len() > 16 || delim.iter().any(|c| c.is_ascii_whitespace() || *c == b'"') {
            self.quoted(b'"');
            return;
        }
        let mut closing = Vec::with_capacity(delim.len() + 2);
        closing.push(b')');
        closing.extend_from_slice(delim);
        closing.push(b'"');
        let end = self.find(&closing, paren + 1).map_or(self.bytes.len(), |e| e + closing.len());
        self.advance_to(end);
    }
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
