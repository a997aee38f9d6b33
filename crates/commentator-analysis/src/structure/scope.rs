//! Scope tree: index-based arena of lexical scopes for one source unit.
//!
//! Nodes live in a `Vec`; parent and children are `ScopeId` indices, so the
//! tree has a single owner and constructs can hold a plain `Copy` id as
//! their non-owning reference to the enclosing scope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node in a `ScopeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    File,
    Namespace,
    Class,
    Function,
    Block,
}

impl ScopeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Function => "function",
            Self::Block => "block",
        }
    }

    /// Scopes where a function definition may appear.
    pub fn admits_function_definitions(&self) -> bool {
        matches!(self, Self::File | Self::Namespace | Self::Class)
    }
}

/// What opened a block scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    Plain,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Try,
    Catch,
    Enum,
    Extern,
    Initializer,
}

impl BlockTag {
    /// Tag for a control keyword, if it is one.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "if" => Self::If,
            "else" => Self::Else,
            "for" => Self::For,
            "while" => Self::While,
            "do" => Self::Do,
            "switch" => Self::Switch,
            "try" => Self::Try,
            "catch" => Self::Catch,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeNode {
    pub kind: ScopeKind,
    /// Empty for anonymous namespaces and blocks.
    pub name: String,
    pub tag: BlockTag,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub depth: u32,
    pub start_line: u32,
    pub end_line: Option<u32>,
    /// Finalized by its matching closing brace (or end of input).
    pub closed: bool,
}

/// All scopes of one source unit. The root is always the file scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![ScopeNode {
                kind: ScopeKind::File,
                name: String::new(),
                tag: BlockTag::Plain,
                parent: None,
                children: Vec::new(),
                depth: 0,
                start_line: 1,
                end_line: None,
                closed: false,
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Open a child scope under `parent`. A closed parent is never mutated;
    /// the child is attached to the nearest open ancestor instead.
    pub fn open(
        &mut self,
        parent: ScopeId,
        kind: ScopeKind,
        name: impl Into<String>,
        tag: BlockTag,
        line: u32,
    ) -> ScopeId {
        let parent = self
            .ancestors(parent)
            .find(|id| !self.get(*id).closed)
            .unwrap_or(ScopeId::ROOT);
        let id = ScopeId(self.nodes.len() as u32);
        let depth = self.get(parent).depth + 1;
        self.nodes.push(ScopeNode {
            kind,
            name: name.into(),
            tag,
            parent: Some(parent),
            children: Vec::new(),
            depth,
            start_line: line,
            end_line: None,
            closed: false,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Finalize a scope. Closing twice keeps the first end line.
    pub fn close(&mut self, id: ScopeId, line: u32) {
        let node = &mut self.nodes[id.index()];
        if !node.closed {
            node.closed = true;
            node.end_line = Some(line);
        }
    }

    #[inline]
    pub fn get(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.get(id).children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &ScopeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (ScopeId(i as u32), n))
    }

    /// `id` itself, then each ancestor up to the root.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |cur| self.get(*cur).parent)
    }

    /// Nearest scope of `kind` at or above `id`.
    pub fn enclosing(&self, id: ScopeId, kind: ScopeKind) -> Option<ScopeId> {
        self.ancestors(id).find(|a| self.get(*a).kind == kind)
    }

    /// Nearest enclosing function, class, namespace, or file (skips blocks).
    pub fn enclosing_named(&self, id: ScopeId) -> ScopeId {
        self.ancestors(id)
            .find(|a| self.get(*a).kind != ScopeKind::Block)
            .unwrap_or(ScopeId::ROOT)
    }

    /// `ns::Class::method` style path of named scopes, outermost first.
    pub fn path(&self, id: ScopeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter(|a| {
                let n = self.get(*a);
                n.kind != ScopeKind::Block && !n.name.is_empty()
            })
            .map(|a| self.get(a).name.as_str())
            .collect();
        names.reverse();
        names.join("::")
    }
}
