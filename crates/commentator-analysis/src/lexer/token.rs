//! Token types.

use serde::{Deserialize, Serialize};

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    StringLiteral,
    CharLiteral,
    Operator,
    Punctuation,
}

/// A lexical unit borrowing its text from the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based line.
    pub line: u32,
    /// 1-based byte column.
    pub column: u32,
    /// Byte offset into the source.
    pub offset: usize,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    #[inline]
    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    /// Byte offset one past the end of the token.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}
