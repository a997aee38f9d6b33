//! Lexer: tokenizes C++ source without compiling it.
//!
//! Comments are stripped into a side channel (`CommentIndex`) and string/char
//! literals are tokenized whole, so brace and paren matching downstream is not
//! corrupted by their contents. Preprocessor directive lines are skipped.

pub mod comments;
pub mod keywords;
pub mod literals;
pub mod token;
pub mod tokenizer;

pub use comments::{looks_like_code, Comment, CommentIndex, CommentStyle};
pub use literals::LiteralValue;
pub use token::{Token, TokenKind};
pub use tokenizer::{LexedSource, Tokenizer};
