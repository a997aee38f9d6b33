//! Structural scanner: lazy construct extraction over a token stream.
//!
//! A single forward pass keeps a stack of open scopes. Statements are
//! recognized from their leading tokens; anything unrecognized is skipped to
//! the next `;`, `{` or `}` at its own nesting level. An unmatched `}` (only
//! the file scope left open) switches the pass to flat mode: braces stop
//! opening and closing scopes and function definitions are no longer
//! detected, but declarations, loops and conditionals still are.

use tracing::debug;

use commentator_core::types::collections::{FxHashSet, SmallVec};

use super::construct::{BitOperator, Construct, ConstructFacts, ConstructKind, SourceLocation};
use super::naming::NamingBucket;
use super::scope::{BlockTag, ScopeId, ScopeKind, ScopeTree};
use crate::lexer::keywords::{is_decl_specifier, is_skipped_statement, is_type_keyword};
use crate::lexer::{CommentIndex, LexedSource, LiteralValue, Token, TokenKind, Tokenizer};

/// Scope to open at a specific `{` once the pass reaches it.
#[derive(Debug, Clone)]
struct PendingScope {
    at: usize,
    kind: ScopeKind,
    name: String,
    tag: BlockTag,
}

/// Anomaly counters for one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub constructs: usize,
    pub scopes: usize,
    /// `}` with no open scope to close.
    pub unmatched_closings: usize,
    /// Scopes still open at end of input.
    pub unclosed_scopes: usize,
    /// Line where flat mode began, if it did.
    pub flat_from_line: Option<u32>,
}

/// Everything extracted from one source unit.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub constructs: Vec<Construct>,
    pub scopes: ScopeTree,
    pub stats: ScanStats,
    pub comments: usize,
}

/// Tokenize and scan a whole source unit eagerly.
pub fn scan_source(file: &str, source: &str) -> FileScan {
    let lexed = Tokenizer::new(source).tokenize();
    let mut stream = ConstructStream::new(file, &lexed);
    let constructs: Vec<Construct> = stream.by_ref().collect();
    let (scopes, stats) = stream.finish();
    FileScan {
        constructs,
        scopes,
        stats,
        comments: lexed.comments.len(),
    }
}

/// Declaration type as parsed from the leading tokens of a statement.
#[derive(Debug, Default)]
struct TypeSpec {
    text: String,
    segments: usize,
    is_static: bool,
    is_const: bool,
}

/// Lazy, finite, non-restartable sequence of constructs for one source unit.
///
/// Iterate it, then call [`ConstructStream::finish`] to take the scope tree.
pub struct ConstructStream<'a> {
    file: String,
    tokens: &'a [Token<'a>],
    comments: &'a CommentIndex,
    pos: usize,
    tree: ScopeTree,
    stack: Vec<ScopeId>,
    flat: bool,
    pending_scope: Option<PendingScope>,
    ready: SmallVec<[Construct; 4]>,
    /// `while` tokens that close a `do ... while (...)` loop.
    do_tails: FxHashSet<usize>,
    stats: ScanStats,
}

impl<'a> Iterator for ConstructStream<'a> {
    type Item = Construct;

    fn next(&mut self) -> Option<Construct> {
        loop {
            if !self.ready.is_empty() {
                self.stats.constructs += 1;
                return Some(self.ready.remove(0));
            }
            if self.pos >= self.tokens.len() {
                return None;
            }
            self.step();
        }
    }
}

impl<'a> ConstructStream<'a> {
    pub fn new(file: &str, lexed: &'a LexedSource<'a>) -> Self {
        Self {
            file: file.to_string(),
            tokens: &lexed.tokens,
            comments: &lexed.comments,
            pos: 0,
            tree: ScopeTree::new(),
            stack: vec![ScopeId::ROOT],
            flat: false,
            pending_scope: None,
            ready: SmallVec::new(),
            do_tails: FxHashSet::default(),
            stats: ScanStats::default(),
        }
    }

    /// Drain remaining constructs, finalize every open scope, and hand back
    /// the tree.
    pub fn finish(mut self) -> (ScopeTree, ScanStats) {
        while self.next().is_some() {}
        let last_line = self.tokens.last().map_or(1, |t| t.line);
        self.stats.unclosed_scopes = self.stack.len().saturating_sub(1);
        while let Some(id) = self.stack.pop() {
            self.tree.close(id, last_line);
        }
        self.tree.close(ScopeId::ROOT, last_line);
        self.stats.scopes = self.tree.len();
        if self.stats.unclosed_scopes > 0 {
            debug!(
                file = %self.file,
                unclosed = self.stats.unclosed_scopes,
                "scopes left open at end of input"
            );
        }
        (self.tree, self.stats)
    }

    // ---- token helpers ----

    #[inline]
    fn tok(&self, i: usize) -> Option<&Token<'a>> {
        self.tokens.get(i)
    }

    #[inline]
    fn text(&self, i: usize) -> &'a str {
        self.tokens.get(i).map_or("", |t| t.text)
    }

    #[inline]
    fn is_ident(&self, i: usize) -> bool {
        self.tok(i).is_some_and(|t| t.kind == TokenKind::Identifier)
    }

    #[inline]
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::ROOT)
    }

    fn current_kind(&self) -> ScopeKind {
        self.tree.get(self.current()).kind
    }

    /// Index of the bracket closing the one at `open`, tracking `()[]{}`.
    /// `None` on a mismatch, end of input, or (unless `allow_semicolons`)
    /// a `;` outside braces.
    fn find_close(&self, open: usize, allow_semicolons: bool) -> Option<usize> {
        let mut stack: SmallVec<[u8; 8]> = SmallVec::new();
        for (i, tok) in self.tokens.iter().enumerate().skip(open) {
            if tok.kind != TokenKind::Punctuation {
                continue;
            }
            match tok.text {
                "(" => stack.push(b')'),
                "[" => stack.push(b']'),
                "{" => stack.push(b'}'),
                ")" | "]" | "}" => {
                    if stack.pop() != Some(tok.text.as_bytes()[0]) {
                        return None;
                    }
                    if stack.is_empty() {
                        return Some(i);
                    }
                }
                ";" if !allow_semicolons && stack.last() != Some(&b'}') => return None,
                _ => {}
            }
        }
        None
    }

    /// Index just past the `>` closing template arguments opened at `lt`.
    fn skip_template_args(&self, lt: usize) -> Option<usize> {
        let mut depth = 0i32;
        let mut parens = 0i32;
        for i in lt..self.tokens.len() {
            match self.text(i) {
                "(" | "[" => parens += 1,
                ")" | "]" => {
                    parens -= 1;
                    if parens < 0 {
                        return None;
                    }
                }
                ";" | "{" | "}" => return None,
                "<" if parens == 0 => depth += 1,
                ">" if parens == 0 => depth -= 1,
                ">>" if parens == 0 => depth -= 2,
                _ => {}
            }
            if depth <= 0 && i > lt {
                return (depth == 0).then_some(i + 1);
            }
        }
        None
    }

    /// Skip an unrecognized statement. Returns the index after its `;`, or
    /// the index of a `{`/`}` that ends it, or of a mismatched closer.
    fn skip_statement(&self, from: usize) -> usize {
        let mut stack: SmallVec<[u8; 8]> = SmallVec::new();
        let mut i = from;
        while i < self.tokens.len() {
            let tok = &self.tokens[i];
            if tok.kind == TokenKind::Punctuation {
                match tok.text {
                    ";" if stack.is_empty() => return i + 1,
                    "{" if stack.is_empty() => {
                        let initializer = i > from
                            && matches!(self.text(i - 1), "=" | "," | "(" | "[" | "return");
                        if !initializer {
                            return i;
                        }
                        stack.push(b'}');
                    }
                    "}" if stack.is_empty() => return i,
                    "(" => stack.push(b')'),
                    "[" => stack.push(b']'),
                    "{" => stack.push(b'}'),
                    ")" | "]" | "}" => {
                        if stack.is_empty() {
                            // Stray closer at statement level.
                        } else if stack.last() == Some(&tok.text.as_bytes()[0]) {
                            stack.pop();
                        } else {
                            return i;
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
        i
    }

    /// Index of the `,` or `;` ending an initializer that starts at `from`.
    fn initializer_end(&self, from: usize) -> Option<usize> {
        let mut stack: SmallVec<[u8; 8]> = SmallVec::new();
        let mut i = from;
        while i < self.tokens.len() {
            let tok = &self.tokens[i];
            match tok.text {
                "," | ";" if stack.is_empty() => return Some(i),
                "<" if i > from && self.is_ident(i - 1) => {
                    if let Some(after) = self.skip_template_args(i) {
                        if matches!(self.text(after), "(" | "{" | "::") {
                            i = after;
                            continue;
                        }
                    }
                }
                "(" => stack.push(b')'),
                "[" => stack.push(b']'),
                "{" => stack.push(b'}'),
                ")" | "]" | "}" => {
                    if stack.pop() != Some(tok.text.as_bytes()[0]) {
                        return None;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    // ---- scope handling ----

    fn step(&mut self) {
        let i = self.pos;
        let tok = self.tokens[i];
        match (tok.kind, tok.text) {
            (TokenKind::Punctuation, "{") => {
                self.open_scope(i);
                self.pos = i + 1;
            }
            (TokenKind::Punctuation, "}") => {
                self.close_scope(i);
                self.pos = i + 1;
            }
            (TokenKind::Punctuation, ";") => self.pos = i + 1,
            _ => {
                self.statement(i, i);
                if self.pos <= i {
                    self.pos = i + 1;
                }
            }
        }
    }

    fn open_scope(&mut self, i: usize) {
        let pending = self.pending_scope.take().filter(|p| p.at == i);
        if self.flat {
            return;
        }
        let (kind, name, tag) = match pending {
            Some(p) => (p.kind, p.name, p.tag),
            None => (ScopeKind::Block, String::new(), BlockTag::Plain),
        };
        let id = self
            .tree
            .open(self.current(), kind, name, tag, self.tokens[i].line);
        self.stack.push(id);
    }

    fn close_scope(&mut self, i: usize) {
        if self.flat {
            return;
        }
        let line = self.tokens[i].line;
        if self.stack.len() > 1 {
            if let Some(id) = self.stack.pop() {
                self.tree.close(id, line);
            }
        } else {
            self.stats.unmatched_closings += 1;
            self.stats.flat_from_line = Some(line);
            self.flat = true;
            debug!(file = %self.file, line, "unmatched closing brace, scanning rest of file flat");
        }
    }

    fn expect_scope(&mut self, at: usize, kind: ScopeKind, name: impl Into<String>, tag: BlockTag) {
        if self.text(at) == "{" {
            self.pending_scope = Some(PendingScope {
                at,
                kind,
                name: name.into(),
                tag,
            });
        }
    }

    // ---- statements ----

    /// Recognize the statement at `i`. `origin` is the first token of the
    /// whole statement including prefixes like `template<...>`.
    fn statement(&mut self, mut i: usize, origin: usize) {
        // Strip `template<...>`, `[[...]]` and `extern "C"` prefixes.
        loop {
            let Some(&tok) = self.tok(i) else {
                self.pos = i;
                return;
            };
            let (next, fallback) = match tok.text {
                "template" if tok.kind == TokenKind::Keyword => {
                    let next = if self.text(i + 1) == "<" {
                        self.skip_template_args(i + 1)
                    } else {
                        Some(i + 1)
                    };
                    (next, i + 1)
                }
                "[" if self.text(i + 1) == "[" => (self.find_close(i, false).map(|c| c + 1), i),
                "extern"
                    if self.tok(i + 1).is_some_and(|t| t.kind == TokenKind::StringLiteral)
                        && self.text(i + 2) != "{" =>
                {
                    (Some(i + 2), i + 2)
                }
                _ => break,
            };
            match next {
                Some(n) if n < self.tokens.len() => i = n,
                _ => {
                    self.pos = self.skip_statement(fallback);
                    return;
                }
            }
        }
        self.statement_body(i, origin);
    }

    fn statement_body(&mut self, i: usize, origin: usize) {
        let Some(&tok) = self.tok(i) else {
            self.pos = i;
            return;
        };

        if tok.kind == TokenKind::Keyword {
            match tok.text {
                "for" | "while" => {
                    if self.do_tails.remove(&i) {
                        self.pos = self.skip_statement(i);
                    } else {
                        self.control(i, origin, ConstructKind::Loop);
                    }
                    return;
                }
                "if" | "switch" => return self.control(i, origin, ConstructKind::Conditional),
                "do" => return self.do_loop(i, origin),
                "else" | "try" => {
                    let tag = if tok.text == "else" {
                        BlockTag::Else
                    } else {
                        BlockTag::Try
                    };
                    self.expect_scope(i + 1, ScopeKind::Block, "", tag);
                    self.pos = i + 1;
                    return;
                }
                "catch" => {
                    let after = if self.text(i + 1) == "(" {
                        self.find_close(i + 1, false).map_or(i + 1, |c| c + 1)
                    } else {
                        i + 1
                    };
                    self.expect_scope(after, ScopeKind::Block, "", BlockTag::Catch);
                    self.pos = after;
                    return;
                }
                "namespace" => return self.namespace(i),
                "inline" if self.text(i + 1) == "namespace" => return self.namespace(i + 1),
                "class" | "struct" | "union" => return self.class_like(i, origin),
                "enum" => return self.enumeration(i, origin),
                "typedef" if matches!(self.text(i + 1), "struct" | "class" | "union" | "enum") => {
                    return self.class_like(i + 1, origin);
                }
                "extern" if self.tok(i + 1).is_some_and(|t| t.kind == TokenKind::StringLiteral) => {
                    self.expect_scope(i + 2, ScopeKind::Namespace, "", BlockTag::Extern);
                    self.pos = i + 2;
                    return;
                }
                "public" | "private" | "protected" => {
                    self.pos = if self.text(i + 1) == ":" { i + 2 } else { i + 1 };
                    return;
                }
                "case" | "default" => {
                    self.pos = self.skip_label(i + 1);
                    return;
                }
                word if is_skipped_statement(word) => {
                    self.pos = self.skip_statement(i);
                    return;
                }
                _ => {}
            }
        }

        if tok.kind == TokenKind::Identifier && self.text(i + 1) == ":" {
            // Label.
            self.pos = i + 2;
            return;
        }

        if !self.declaration(i, origin) {
            self.pos = self.skip_statement(i);
        }
    }

    /// Skip a `case X:` / `default:` label, returning the index after `:`.
    fn skip_label(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.tokens.len() {
            match self.text(i) {
                ":" => return i + 1,
                ";" | "{" | "}" => return i,
                _ => i += 1,
            }
        }
        i
    }

    fn namespace(&mut self, i: usize) {
        let mut j = i + 1;
        let mut name = String::new();
        while let Some(t) = self.tok(j) {
            match t.text {
                "{" => {
                    self.expect_scope(j, ScopeKind::Namespace, name, BlockTag::Plain);
                    self.pos = j;
                    return;
                }
                "::" => name.push_str("::"),
                _ if t.kind == TokenKind::Identifier => name.push_str(t.text),
                "inline" => {}
                _ => break,
            }
            j += 1;
        }
        // `namespace alias = other;` or malformed.
        self.pos = self.skip_statement(i);
    }

    fn class_like(&mut self, i: usize, origin: usize) {
        // `struct stat st;` / `struct Foo* p = ...;` declare variables.
        let elaborated = self.is_ident(i + 1)
            && (self.is_ident(i + 2) || matches!(self.text(i + 2), "*" | "&"));
        if elaborated && self.declaration(i, origin) {
            return;
        }

        let mut j = i + 1;
        let mut name = "";
        let mut in_bases = false;
        while let Some(t) = self.tok(j) {
            match t.text {
                "{" => {
                    self.expect_scope(j, ScopeKind::Class, name, BlockTag::Plain);
                    self.pos = j;
                    return;
                }
                ";" | "}" | "=" => break,
                ":" => in_bases = true,
                "(" | "[" => match self.find_close(j, false) {
                    Some(close) => j = close,
                    None => break,
                },
                "<" => match self.skip_template_args(j) {
                    Some(after) => {
                        j = after;
                        continue;
                    }
                    None => break,
                },
                _ if !in_bases && t.kind == TokenKind::Identifier && t.text != "final" => {
                    name = t.text;
                }
                _ => {}
            }
            j += 1;
        }
        self.pos = self.skip_statement(i);
    }

    fn enumeration(&mut self, i: usize, origin: usize) {
        let mut j = i + 1;
        if matches!(self.text(j), "class" | "struct") {
            j += 1;
        }
        let name = if self.is_ident(j) { self.text(j) } else { "" };
        while let Some(t) = self.tok(j) {
            match t.text {
                "{" => {
                    self.expect_scope(j, ScopeKind::Block, name, BlockTag::Enum);
                    self.pos = j;
                    return;
                }
                ";" | "}" => break,
                _ => j += 1,
            }
        }
        // Opaque enum declaration or an elaborated variable declaration.
        if !self.declaration(i, origin) {
            self.pos = self.skip_statement(i);
        }
    }

    // ---- constructs ----

    fn make(&self, kind: ConstructKind, origin: usize, last: usize, identifier: Option<String>) -> Construct {
        let first = self.tokens[origin];
        let last = self.tokens[last.min(self.tokens.len() - 1)];
        let existing_comment = self
            .comments
            .adjacent(first.line, first.offset)
            .map(|c| c.text.clone());
        Construct {
            kind,
            scope: self.current(),
            location: SourceLocation {
                file: self.file.clone(),
                line_start: first.line,
                line_end: last.line.max(first.line),
                column: first.column,
            },
            bucket: NamingBucket::classify(identifier.as_deref()),
            identifier,
            qualified_name: None,
            literals: SmallVec::new(),
            existing_comment,
            facts: ConstructFacts::default(),
        }
    }

    /// Record numeric literals (and optionally operators) in `[from, to)`.
    fn record_header_facts(&self, c: &mut Construct, from: usize, to: usize, operators: bool) {
        let to = to.min(self.tokens.len());
        for k in from..to {
            let t = &self.tokens[k];
            match t.kind {
                TokenKind::Number => c.literals.push(LiteralValue::new(t.text)),
                TokenKind::Operator if operators => {
                    // `auto& x`, `const Foo& y`: references, not bitwise and.
                    let reference = matches!(t.text, "&" | "&&")
                        && k > 0
                        && self.tokens[k - 1].kind == TokenKind::Keyword;
                    if let (false, Some(op)) = (reference, BitOperator::from_token(t.text)) {
                        c.facts.record_operator(op);
                    }
                }
                _ => {}
            }
        }
    }

    fn control(&mut self, i: usize, origin: usize, kind: ConstructKind) {
        let keyword = self.text(i);
        let mut open = i + 1;
        if self.text(open) == "constexpr" {
            open += 1;
        }
        if self.text(open) != "(" {
            self.pos = self.skip_statement(i + 1);
            return;
        }
        let Some(close) = self.find_close(open, keyword == "for") else {
            self.pos = self.skip_statement(open);
            return;
        };

        let (identifier, operators_from) = self.header_identifier(keyword, open + 1, close);
        let mut construct = self.make(kind, origin, close, identifier);
        construct.facts.keyword = Some(keyword.to_string());
        self.record_header_facts(&mut construct, open + 1, operators_from, false);
        self.record_header_facts(&mut construct, operators_from, close, true);
        self.ready.push(construct);

        if let Some(tag) = BlockTag::from_keyword(keyword) {
            self.expect_scope(close + 1, ScopeKind::Block, "", tag);
        }
        self.pos = close + 1;
    }

    /// Identifier a loop/conditional header is "about", and where operator
    /// scanning should start (after a range-for declaration).
    fn header_identifier(&self, keyword: &str, from: usize, to: usize) -> (Option<String>, usize) {
        let first_ident = || {
            (from..to)
                .find(|&k| self.is_ident(k))
                .map(|k| self.text(k).to_string())
        };
        if keyword != "for" {
            return (first_ident(), from);
        }

        let mut depth = 0i32;
        for k in from..to {
            match self.text(k) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth -= 1,
                ":" if depth == 0 => {
                    let var = (from..k).rev().find(|&v| self.is_ident(v));
                    return (var.map(|v| self.text(v).to_string()), k + 1);
                }
                ";" if depth == 0 => break,
                _ => {}
            }
        }
        let init_var = (from..to)
            .take_while(|&k| self.text(k) != ";")
            .find(|&k| self.is_ident(k) && matches!(self.text(k + 1), "=" | "{" | "("));
        match init_var {
            Some(k) => (Some(self.text(k).to_string()), from),
            None => (first_ident(), from),
        }
    }

    fn do_loop(&mut self, i: usize, origin: usize) {
        let mut construct = self.make(ConstructKind::Loop, origin, i, None);
        construct.facts.keyword = Some("do".to_string());
        if self.text(i + 1) == "{" {
            if let Some(end) = self.find_close(i + 1, true) {
                if self.text(end + 1) == "while" && self.text(end + 2) == "(" {
                    if let Some(close) = self.find_close(end + 2, false) {
                        let (identifier, ops) = self.header_identifier("while", end + 3, close);
                        construct.bucket = NamingBucket::classify(identifier.as_deref());
                        construct.identifier = identifier;
                        self.record_header_facts(&mut construct, ops, close, true);
                        self.do_tails.insert(end + 1);
                    }
                }
            }
        }
        self.ready.push(construct);
        self.expect_scope(i + 1, ScopeKind::Block, "", BlockTag::Do);
        self.pos = i + 1;
    }

    // ---- declarations ----

    /// Parse declaration specifiers and a type starting at `i`.
    /// Returns the type and the index of the first token after it.
    fn parse_type(&self, i: usize) -> Option<(TypeSpec, usize)> {
        let mut spec = TypeSpec::default();
        let mut j = i;
        loop {
            let t = self.tok(j)?;
            if t.kind == TokenKind::Keyword && is_decl_specifier(t.text) {
                match t.text {
                    "static" => spec.is_static = true,
                    "const" | "constexpr" | "constinit" | "consteval" => spec.is_const = true,
                    _ => {}
                }
                j += 1;
            } else if matches!(t.text, "alignas" | "__declspec" | "__attribute__")
                && self.text(j + 1) == "("
            {
                j = self.find_close(j + 1, false)? + 1;
            } else if t.text == "[" && self.text(j + 1) == "[" {
                j = self.find_close(j, false)? + 1;
            } else {
                break;
            }
        }

        if matches!(self.text(j), "struct" | "class" | "union" | "enum") {
            j += 1;
        }

        let type_start = j;
        let first = self.tok(j)?;
        if first.kind == TokenKind::Keyword && is_type_keyword(first.text) {
            while let Some(t) = self.tok(j) {
                if t.kind == TokenKind::Keyword && (is_type_keyword(t.text) || t.text == "const" || t.text == "volatile") {
                    if t.text == "const" {
                        spec.is_const = true;
                    }
                    j += 1;
                } else {
                    break;
                }
            }
            spec.segments = 1;
        } else if first.text == "decltype" && self.text(j + 1) == "(" {
            j = self.find_close(j + 1, false)? + 1;
            spec.segments = 1;
        } else if first.kind == TokenKind::Identifier || first.text == "::" {
            if self.text(j) == "::" {
                j += 1;
            }
            loop {
                if self.text(j) == "template" {
                    j += 1;
                }
                if !self.is_ident(j) {
                    return None;
                }
                j += 1;
                spec.segments += 1;
                if self.text(j) == "<" {
                    j = self.skip_template_args(j)?;
                }
                if self.text(j) == "::" && self.is_ident(j + 1) {
                    j += 1;
                } else {
                    break;
                }
            }
        } else {
            return None;
        }

        while matches!(self.text(j), "const" | "volatile") {
            spec.is_const |= self.text(j) == "const";
            j += 1;
        }
        while matches!(self.text(j), "*" | "&" | "&&")
            || (self.text(j) == "const" && matches!(self.text(j.saturating_sub(1)), "*" | "&"))
        {
            j += 1;
        }
        spec.text = render(&self.tokens[type_start..j]);
        Some((spec, j))
    }

    /// Try to recognize a declaration or function definition at `i`.
    /// Returns false when nothing matched, leaving `pos` untouched.
    fn declaration(&mut self, i: usize, origin: usize) -> bool {
        // In-class destructor: `~Foo() {`, `virtual ~Foo() = default;`.
        let mut j = i;
        while self.tok(j).is_some_and(|t| t.kind == TokenKind::Keyword && is_decl_specifier(t.text)) {
            j += 1;
        }
        if self.text(j) == "~" && self.is_ident(j + 1) && self.text(j + 2) == "(" {
            let name = format!("~{}", self.text(j + 1));
            return self.function(origin, j + 2, vec![name], None, TypeSpec::default());
        }

        let Some((spec, mut j)) = self.parse_type(i) else {
            return false;
        };

        // Constructors and destructors have no return type.
        if self.text(j) == "(" {
            let segments: Vec<String> = split_segments(&spec.text);
            let in_class_ctor = spec.segments == 1
                && self.current_kind() == ScopeKind::Class
                && self.tree.get(self.current()).name == spec.text;
            if spec.segments >= 2 || in_class_ctor {
                return self.function(origin, j, segments, None, spec);
            }
            return false;
        }
        if self.text(j) == "::" && self.text(j + 1) == "~" && self.is_ident(j + 2) && self.text(j + 3) == "(" {
            let mut segments = split_segments(&spec.text);
            segments.push(format!("~{}", self.text(j + 2)));
            return self.function(origin, j + 3, segments, None, spec);
        }

        // Declarator name, possibly qualified.
        let mut segments: Vec<String> = Vec::new();
        if self.is_ident(j) {
            segments.push(self.text(j).to_string());
            j += 1;
            while self.text(j) == "::" {
                if self.is_ident(j + 1) {
                    segments.push(self.text(j + 1).to_string());
                    j += 2;
                } else if self.text(j + 1) == "~" && self.is_ident(j + 2) {
                    segments.push(format!("~{}", self.text(j + 2)));
                    j += 3;
                } else if self.text(j + 1) == "operator" {
                    let Some((name, after)) = self.operator_name(j + 1) else {
                        return false;
                    };
                    segments.push(name);
                    j = after;
                    break;
                } else {
                    return false;
                }
            }
        } else if self.text(j) == "operator" {
            let Some((name, after)) = self.operator_name(j) else {
                return false;
            };
            segments.push(name);
            j = after;
        } else {
            return false;
        }

        if self.text(j) == "(" {
            let ty = spec.text.clone();
            return self.function(origin, j, segments, Some(ty), spec);
        }
        if segments.len() != 1 {
            return false;
        }
        self.variables(origin, j, segments.remove(0), spec)
    }

    /// Name of an `operator` overload starting at the `operator` keyword.
    fn operator_name(&self, at: usize) -> Option<(String, usize)> {
        let mut j = at + 1;
        let mut name = String::from("operator");
        if self.text(j) == "(" && self.text(j + 1) == ")" {
            name.push_str("()");
            return Some((name, j + 2));
        }
        let start = j;
        while j < self.tokens.len() && self.text(j) != "(" && j - start < 4 {
            // `operator new`, `operator bool`: words are space-separated.
            if self.tok(j)?.kind != TokenKind::Operator && !matches!(self.text(j), "[" | "]") {
                name.push(' ');
            }
            name.push_str(self.text(j));
            j += 1;
        }
        (self.text(j) == "(" && j > start).then_some((name, j))
    }

    /// Function candidate whose parameter list opens at `open`.
    fn function(
        &mut self,
        origin: usize,
        open: usize,
        segments: Vec<String>,
        return_type: Option<String>,
        spec: TypeSpec,
    ) -> bool {
        let Some(close) = self.find_close(open, false) else {
            return false;
        };
        let mut k = close + 1;
        loop {
            match self.text(k) {
                "const" | "volatile" | "override" | "final" | "mutable" | "&" | "&&" => k += 1,
                "noexcept" | "throw" => {
                    k += 1;
                    if self.text(k) == "(" {
                        match self.find_close(k, false) {
                            Some(c) => k = c + 1,
                            None => return false,
                        }
                    }
                }
                "->" => {
                    k += 1;
                    while k < self.tokens.len() && !matches!(self.text(k), "{" | ";" | "=" | "}") {
                        if self.text(k) == "<" {
                            match self.skip_template_args(k) {
                                Some(after) => k = after,
                                None => return false,
                            }
                        } else {
                            k += 1;
                        }
                    }
                }
                "[" if self.text(k + 1) == "[" => match self.find_close(k, false) {
                    Some(c) => k = c + 1,
                    None => return false,
                },
                _ => break,
            }
        }

        let body = match self.text(k) {
            "{" => k,
            ":" => match self.initializer_list_end(k + 1) {
                Some(body) => body,
                None => return false,
            },
            ";" | "=" => {
                // A qualified name with no declarator before `(` is a call.
                if return_type.is_some() && self.is_paren_initialized_variable(open, close, k) {
                    let name = segments.into_iter().last().unwrap_or_default();
                    let mut construct =
                        self.make(ConstructKind::VariableDeclaration, origin, close, Some(name));
                    construct.facts.type_text = Some(spec.text);
                    construct.facts.is_static = spec.is_static;
                    construct.facts.is_const = spec.is_const;
                    self.record_header_facts(&mut construct, open + 1, close, true);
                    self.ready.push(construct);
                }
                // Prototype, `= 0`, `= default`, `= delete`.
                self.pos = self.skip_statement(k);
                return true;
            }
            _ => return false,
        };

        if self.flat || !self.current_kind().admits_function_definitions() {
            return false;
        }

        let name = segments.last().cloned().unwrap_or_default();
        let mut construct = self.make(ConstructKind::FunctionDefinition, origin, close, Some(name.clone()));
        if segments.len() > 1 {
            construct.qualified_name = Some(segments.join("::"));
        }
        construct.facts.type_text = return_type.filter(|t| !t.is_empty());
        construct.facts.is_static = spec.is_static;
        construct.facts.is_const = spec.is_const;
        self.record_header_facts(&mut construct, open + 1, close, false);
        self.ready.push(construct);

        self.expect_scope(body, ScopeKind::Function, name, BlockTag::Plain);
        self.pos = body;
        true
    }

    /// `std::vector<int> v(10);` inside a function body: a variable with
    /// constructor arguments rather than a prototype.
    fn is_paren_initialized_variable(&self, open: usize, close: usize, end: usize) -> bool {
        if self.text(end) != ";" || close == open + 1 {
            return false;
        }
        if self.flat || !matches!(self.current_kind(), ScopeKind::Function | ScopeKind::Block) {
            return false;
        }
        let Some(first) = self.tok(open + 1) else {
            return false;
        };
        match first.kind {
            TokenKind::Number | TokenKind::StringLiteral | TokenKind::CharLiteral => true,
            TokenKind::Identifier => matches!(self.text(open + 2), "," | ")" | "." | "->" | "+" | "-" | "*" | "/"),
            _ => false,
        }
    }

    /// Skip a constructor initializer list starting after `:`.
    /// Returns the index of the body's `{`.
    fn initializer_list_end(&self, from: usize) -> Option<usize> {
        let mut j = from;
        loop {
            // Member or base name.
            if self.text(j) == "::" {
                j += 1;
            }
            while self.is_ident(j) || self.text(j) == "::" {
                j += 1;
                if self.text(j) == "<" {
                    j = self.skip_template_args(j)?;
                }
            }
            if !matches!(self.text(j), "(" | "{") {
                return None;
            }
            j = self.find_close(j, false)? + 1;
            if self.text(j) == "..." {
                j += 1;
            }
            match self.text(j) {
                "," => j += 1,
                "{" => return Some(j),
                _ => return None,
            }
        }
    }

    /// One or more declarators starting right after the first name.
    fn variables(&mut self, origin: usize, mut j: usize, first_name: String, spec: TypeSpec) -> bool {
        let mut found: SmallVec<[Construct; 2]> = SmallVec::new();
        let mut name = first_name;
        loop {
            let mut construct = self.make(ConstructKind::VariableDeclaration, origin, j, Some(name));
            construct.facts.type_text = Some(spec.text.clone());
            construct.facts.is_static = spec.is_static;
            construct.facts.is_const = spec.is_const;

            while self.text(j) == "[" {
                let Some(close) = self.find_close(j, false) else {
                    return false;
                };
                construct.facts.is_array = true;
                self.record_header_facts(&mut construct, j + 1, close, false);
                j = close + 1;
            }
            if self.text(j) == ":" {
                // Bit-field width.
                j += 1;
                while self.tok(j).is_some_and(|t| !matches!(t.text, "," | ";" | "=" | "{" | "}")) {
                    j += 1;
                }
            }
            match self.text(j) {
                "=" => {
                    let Some(end) = self.initializer_end(j + 1) else {
                        return false;
                    };
                    self.record_header_facts(&mut construct, j + 1, end, true);
                    j = end;
                }
                "{" | "(" => {
                    let Some(close) = self.find_close(j, false) else {
                        return false;
                    };
                    self.record_header_facts(&mut construct, j + 1, close, true);
                    j = close + 1;
                }
                _ => {}
            }
            if let Some(last) = self.tok(j.saturating_sub(1)) {
                construct.location.line_end = last.line.max(construct.location.line_start);
            }
            found.push(construct);

            match self.text(j) {
                ";" => {
                    j += 1;
                    break;
                }
                "," => {
                    j += 1;
                    while matches!(self.text(j), "*" | "&" | "&&" | "const") {
                        j += 1;
                    }
                    if !self.is_ident(j) {
                        return false;
                    }
                    name = self.text(j).to_string();
                    j += 1;
                }
                _ => return false,
            }
        }
        self.ready.extend(found);
        self.pos = j;
        true
    }
}

/// Join tokens into readable type text: spaces only between word tokens.
fn render(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for t in tokens {
        let word = matches!(
            t.kind,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Number
        );
        if word && prev_word {
            out.push(' ');
        }
        out.push_str(t.text);
        prev_word = word;
    }
    out
}

/// `a::b<int>::c` -> ["a", "b<int>", "c"], splitting only outside `<>`.
fn split_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ':' if depth == 0 && chars.peek() == Some(&':') => {
                chars.next();
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> FileScan {
        scan_source("test.cpp", src)
    }

    fn kinds(scan: &FileScan) -> Vec<(ConstructKind, Option<&str>)> {
        scan.constructs
            .iter()
            .map(|c| (c.kind, c.identifier.as_deref()))
            .collect()
    }

    #[test]
    fn simple_variable_with_hex_literal() {
        let result = scan("int base = 0xA000;");
        assert_eq!(result.constructs.len(), 1);
        let c = &result.constructs[0];
        assert_eq!(c.kind, ConstructKind::VariableDeclaration);
        assert_eq!(c.identifier(), Some("base"));
        assert_eq!(c.literals[0].key, "0xa000");
        assert_eq!(c.facts.type_text.as_deref(), Some("int"));
        assert_eq!(c.bucket, NamingBucket::SingleWord);
        assert!(c.existing_comment.is_none());
    }

    #[test]
    fn function_loop_and_conditional() {
        let src = r#"
namespace game {
class World {
public:
    void update(float dt) {
        for (int i = 0; i < 10; ++i) {
            if (flags & 0x4) {
                count++;
            }
        }
    }
};
}
"#;
        let result = scan(src);
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("update")),
                (ConstructKind::Loop, Some("i")),
                (ConstructKind::Conditional, Some("flags")),
            ]
        );
        let cond = &result.constructs[2];
        assert_eq!(cond.literals[0].key, "0x4");
        assert_eq!(cond.facts.operators, vec![BitOperator::And]);

        let func = &result.constructs[0];
        let scope = result.scopes.get(func.scope);
        assert_eq!(scope.kind, ScopeKind::Class);
        assert_eq!(scope.name, "World");
        assert_eq!(result.scopes.path(func.scope), "game::World");

        let lp = &result.constructs[1];
        assert_eq!(result.scopes.get(lp.scope).kind, ScopeKind::Function);
        assert_eq!(result.stats.unclosed_scopes, 0);
        assert!(result.stats.flat_from_line.is_none());
    }

    #[test]
    fn out_of_class_member_definitions() {
        let src = "Foo::Foo(int x) : a(x), b{2} {}\nFoo::~Foo() {}\nstd::string Foo::name() const { return n; }";
        let result = scan(src);
        let names: Vec<_> = result
            .constructs
            .iter()
            .map(|c| (c.identifier.clone().unwrap(), c.qualified_name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Foo".to_string(), Some("Foo::Foo".to_string())),
                ("~Foo".to_string(), Some("Foo::~Foo".to_string())),
                ("name".to_string(), Some("Foo::name".to_string())),
            ]
        );
        assert_eq!(result.constructs[2].facts.type_text.as_deref(), Some("std::string"));
    }

    #[test]
    fn prototypes_are_not_definitions() {
        let result = scan("void f(int a);\nint g() = delete;\nvirtual void h() = 0;");
        assert!(result.constructs.is_empty());
    }

    #[test]
    fn function_definitions_only_at_file_namespace_or_class_scope() {
        let result = scan("void outer() { MACRO_THING(x) { int y; } }");
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("outer")),
                (ConstructKind::VariableDeclaration, Some("y")),
            ]
        );
    }

    #[test]
    fn multiple_declarators_and_arrays() {
        let result = scan("static const unsigned char table[256] = {0}, *p = nullptr;");
        assert_eq!(result.constructs.len(), 2);
        let table = &result.constructs[0];
        assert!(table.facts.is_array);
        assert!(table.facts.is_static);
        assert!(table.facts.is_const);
        assert_eq!(table.facts.type_text.as_deref(), Some("unsigned char"));
        let keys: Vec<_> = table.literals.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["256", "0"]);
        assert_eq!(result.constructs[1].identifier(), Some("p"));
    }

    #[test]
    fn template_types_and_brace_init() {
        let result = scan("std::map<int, std::vector<int>> lookup{};\nauto m = std::pair<int, int>(1, 2);");
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::VariableDeclaration, Some("lookup")),
                (ConstructKind::VariableDeclaration, Some("m")),
            ]
        );
        assert_eq!(
            result.constructs[0].facts.type_text.as_deref(),
            Some("std::map<int,std::vector<int>>")
        );
        assert_eq!(result.constructs[1].literals.len(), 2);
    }

    #[test]
    fn expression_statements_are_skipped() {
        let result = scan("void f() { x = 5; foo(3); std::cout << x; i++; obj.run(); return; }");
        assert_eq!(kinds(&result), vec![(ConstructKind::FunctionDefinition, Some("f"))]);
    }

    #[test]
    fn qualified_calls_are_not_declarations() {
        let src = "void f() {\n  std::sort(v.begin(), v.end());\n  std::swap(a, b);\n  Logger::log(\"x\");\n  std::vector<int> cells(v.size());\n}";
        let result = scan(src);
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("f")),
                (ConstructKind::VariableDeclaration, Some("cells")),
            ]
        );
        assert_eq!(result.constructs[1].location.line_start, 5);
    }

    #[test]
    fn adjacent_comments_are_attached() {
        let src = "// counter\nint a;\nint b; // trailing\n\n// detached\n\nint c;";
        let result = scan(src);
        let comments: Vec<_> = result
            .constructs
            .iter()
            .map(|c| c.existing_comment.as_deref())
            .collect();
        assert_eq!(comments, vec![Some("counter"), Some("trailing"), None]);
    }

    #[test]
    fn template_prefix_keeps_comment_adjacency() {
        let src = "// max of two\ntemplate <typename T>\nT biggest(T a, T b) { return a > b ? a : b; }";
        let result = scan(src);
        assert_eq!(result.constructs.len(), 1);
        assert_eq!(result.constructs[0].existing_comment.as_deref(), Some("max of two"));
        assert_eq!(result.constructs[0].location.line_start, 2);
    }

    #[test]
    fn stacked_prefixes_do_not_grow_the_stack() {
        let src = format!(
            "{}int f() {{ return 1; }}\nextern \"C\" int g;",
            "[[nodiscard]] template <> ".repeat(20_000)
        );
        let result = scan(&src);
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("f")),
                (ConstructKind::VariableDeclaration, Some("g")),
            ]
        );
        assert_eq!(result.constructs[0].location.line_start, 1);
    }

    #[test]
    fn do_while_counts_once() {
        let result = scan("void f() { do { n--; } while (n > 3); while (running) { tick(); } }");
        let loops: Vec<_> = result
            .constructs
            .iter()
            .filter(|c| c.kind == ConstructKind::Loop)
            .map(|c| (c.facts.keyword.clone().unwrap(), c.identifier.clone()))
            .collect();
        assert_eq!(
            loops,
            vec![
                ("do".to_string(), Some("n".to_string())),
                ("while".to_string(), Some("running".to_string())),
            ]
        );
        assert_eq!(result.constructs[1].literals[0].key, "3");
    }

    #[test]
    fn range_for_identifier_and_reference_is_not_an_operator() {
        let result = scan("void f() { for (auto& e : items) { use(e); } }");
        let lp = &result.constructs[1];
        assert_eq!(lp.identifier(), Some("e"));
        assert!(lp.facts.operators.is_empty());
    }

    #[test]
    fn unmatched_closing_brace_degrades_to_flat() {
        let src = "void a() { int x = 1; }\n}\nvoid b() { int y = 2; for (;;) {} }";
        let result = scan(src);
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("a")),
                (ConstructKind::VariableDeclaration, Some("x")),
                (ConstructKind::VariableDeclaration, Some("y")),
                (ConstructKind::Loop, None),
            ]
        );
        assert_eq!(result.stats.unmatched_closings, 1);
        assert_eq!(result.stats.flat_from_line, Some(2));
        assert!(result
            .constructs
            .iter()
            .skip(2)
            .all(|c| c.scope == ScopeId::ROOT));
    }

    #[test]
    fn unclosed_scopes_are_finalized() {
        let result = scan("void f() { if (x) { int y;");
        assert_eq!(result.stats.unclosed_scopes, 2);
        assert!(result.scopes.iter().all(|(_, n)| n.closed));
    }

    #[test]
    fn enums_and_forward_declarations_yield_nothing() {
        let result = scan("enum class Color : unsigned { RED = 1, GREEN = 0x2 };\nstruct Later;\nclass Fwd;");
        assert!(result.constructs.is_empty());
        let enum_scope = result
            .scopes
            .iter()
            .find(|(_, n)| n.tag == BlockTag::Enum)
            .map(|(_, n)| n.name.clone());
        assert_eq!(enum_scope.as_deref(), Some("Color"));
    }

    #[test]
    fn class_members_and_constructor() {
        let src = "struct Player : public Entity {\n  explicit Player(int id) : m_id(id) {}\n  int m_id;\n  static constexpr int kMaxHealth = 100;\n};";
        let result = scan(src);
        assert_eq!(
            kinds(&result),
            vec![
                (ConstructKind::FunctionDefinition, Some("Player")),
                (ConstructKind::VariableDeclaration, Some("m_id")),
                (ConstructKind::VariableDeclaration, Some("kMaxHealth")),
            ]
        );
        assert_eq!(result.constructs[1].bucket, NamingBucket::Prefixed);
        assert_eq!(result.constructs[2].literals[0].key, "100");
        assert!(result.constructs[2].facts.is_const);
    }

    #[test]
    fn paren_initialized_locals() {
        let result = scan("void f() { std::vector<int> cells(64); }");
        assert_eq!(result.constructs[1].identifier(), Some("cells"));
        assert_eq!(result.constructs[1].literals[0].key, "64");
    }

    #[test]
    fn operator_overloads() {
        let result = scan("struct V { bool operator==(const V& o) const { return true; } };");
        assert_eq!(result.constructs[0].identifier(), Some("operator=="));
    }

    #[test]
    fn preprocessor_braces_do_not_unbalance() {
        let src = "#define BEGIN {\n#define END }\nvoid f() {\n#if X\n  int a;\n#endif\n}";
        let result = scan(src);
        assert_eq!(result.constructs.len(), 2);
        assert!(result.stats.flat_from_line.is_none());
    }

    #[test]
    fn stream_is_lazy_and_finite() {
        let lexed = Tokenizer::new("int a; int b; int c;").tokenize();
        let mut stream = ConstructStream::new("lazy.cpp", &lexed);
        assert_eq!(stream.next().map(|c| c.identifier), Some(Some("a".to_string())));
        let (tree, stats) = stream.finish();
        assert_eq!(stats.constructs, 3);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn split_segments_respects_templates() {
        assert_eq!(split_segments("a::b<x::y>::c"), vec!["a", "b<x::y>", "c"]);
        assert_eq!(split_segments("Foo"), vec!["Foo"]);
    }
}
