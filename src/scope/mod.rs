//! Scope attribution for source lines.
//!
//! Parses a file with tree-sitter and resolves, for every line, the innermost
//! enclosing class or function definition. The index is built once per file
//! and reused by every context lookup within a compare operation.

pub mod indexer;

use serde::{Deserialize, Serialize};

/// The syntactic region a line belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    #[default]
    Module,
    Class,
    Function,
}

/// One class or function definition occupying an inclusive 1-indexed line range.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeSpan {
    pub name: String,
    pub kind: ScopeKind,
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    /// Arena index of the nearest enclosing definition, if any.
    #[serde(skip)]
    pub parent: Option<usize>,
}

/// Scope attribution for a single source line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineContext {
    #[serde(rename = "enclosingClass")]
    pub enclosing_class: Option<String>,
    #[serde(rename = "enclosingFunction")]
    pub enclosing_function: Option<String>,
    pub kind: ScopeKind,
}

/// Per-line scope index for one file.
///
/// `spans` is an arena in pre-order (a definition always precedes the
/// definitions nested inside it); `line_contexts[n - 1]` is the resolved
/// context for line `n`. When the file does not parse, `syntax_error` is set
/// and every line degrades to module scope with no enclosing names.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeIndex {
    pub spans: Vec<ScopeSpan>,
    #[serde(rename = "lineContexts")]
    pub line_contexts: Vec<LineContext>,
    #[serde(rename = "syntaxError")]
    pub syntax_error: bool,
    /// Innermost covering span per line, parallel to `line_contexts`.
    #[serde(skip)]
    line_spans: Vec<Option<usize>>,
}

impl ScopeIndex {
    pub(crate) fn new(line_count: usize) -> Self {
        Self {
            spans: Vec::new(),
            line_contexts: vec![LineContext::default(); line_count],
            syntax_error: false,
            line_spans: vec![None; line_count],
        }
    }

    /// Resolved context for a 1-indexed line.
    pub fn context(&self, line: u32) -> Option<&LineContext> {
        if line == 0 {
            return None;
        }
        self.line_contexts.get(line as usize - 1)
    }

    /// Arena index of the innermost definition covering a line.
    pub fn innermost_span_index(&self, line: u32) -> Option<usize> {
        if line == 0 {
            return None;
        }
        self.line_spans.get(line as usize - 1).copied().flatten()
    }

    pub fn span(&self, index: usize) -> &ScopeSpan {
        &self.spans[index]
    }

    /// Nearest ancestor-or-self span of the given kind.
    pub fn nearest_of_kind(&self, from: usize, kind: ScopeKind) -> Option<usize> {
        let mut current = Some(from);
        while let Some(idx) = current {
            if self.spans[idx].kind == kind {
                return Some(idx);
            }
            current = self.spans[idx].parent;
        }
        None
    }

    /// The top-level ancestor of a span (itself, when not nested).
    pub fn root_ancestor(&self, from: usize) -> usize {
        let mut idx = from;
        while let Some(parent) = self.spans[idx].parent {
            idx = parent;
        }
        idx
    }

    /// Top-level (non-nested) definitions in source order.
    pub fn top_level_spans(&self) -> Vec<usize> {
        self.spans
            .iter()
            .enumerate()
            .filter(|(_, span)| span.parent.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn set_line_span(&mut self, line: u32, span_index: usize) {
        if let Some(slot) = self.line_spans.get_mut(line as usize - 1) {
            *slot = Some(span_index);
        }
    }
}
