//! Context-block selection for changed lines.
//!
//! Given a target line and that file's scope index, picks the block of
//! surrounding source a reader needs to understand the change, at a
//! caller-selected granularity: 0 shows the innermost enclosing definition,
//! 1 the parent scope, 2 and above the whole file. Lines with no enclosing
//! definition fall back to a fixed window around the target.

use crate::report;
use crate::scope::{ScopeIndex, ScopeKind};
use crate::source::SourceText;
use serde::Serialize;

/// Fallback window radius at level 0.
const NARROW_WINDOW: u32 = 5;
/// Fallback window radius at level 1.
const WIDE_WINDOW: u32 = 20;
/// Blocks longer than this get a one-line size notice.
const LARGE_BLOCK_THRESHOLD: usize = 50;

/// Which side of the comparison a block was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Old => "OLD FILE",
            Side::New => "NEW FILE",
        }
    }
}

/// A selected excerpt of source lines explaining one changed line.
#[derive(Debug, Clone, Serialize)]
pub struct ContextBlock {
    pub side: Side,
    pub level: u32,
    #[serde(rename = "targetLine")]
    pub target_line: u32,
    pub description: String,
    /// `(line_number, text)` pairs covering the block, in order.
    pub lines: Vec<(u32, String)>,
}

impl ContextBlock {
    /// Render the block with its delimiters, header, and marked target line.
    pub fn render(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 4);

        let mut header = format!("\nFULL CONTEXT ({})", self.side.label());
        if self.level > 0 {
            header.push_str(&format!(" Level {}", self.level));
        }
        header.push_str(&format!(": {}", self.description));
        out.push(header);

        if self.lines.len() > LARGE_BLOCK_THRESHOLD {
            out.push(format!(
                "[showing {} lines, target line {} marked]",
                self.lines.len(),
                self.target_line
            ));
        }

        out.push(report::delimiter());
        for (number, text) in &self.lines {
            out.push(report::format_context_line(
                *number,
                text,
                *number == self.target_line,
            ));
        }
        out.push(report::delimiter());
        out.join("\n")
    }

    /// The block's source lines as plain text, without numbering or markers.
    pub fn raw_text(&self) -> String {
        let texts: Vec<&str> = self.lines.iter().map(|(_, text)| text.as_str()).collect();
        texts.join("\n")
    }

    /// 1-indexed numbers of the lines the block covers.
    pub fn line_numbers(&self) -> Vec<u32> {
        self.lines.iter().map(|(number, _)| *number).collect()
    }
}

/// Resolves context blocks against one side's source and scope index.
///
/// The scope index is parsed once per side and shared by every resolution
/// within a compare operation.
pub struct ContextResolver<'a> {
    source: &'a SourceText,
    index: &'a ScopeIndex,
    side: Side,
}

impl<'a> ContextResolver<'a> {
    pub fn new(source: &'a SourceText, index: &'a ScopeIndex, side: Side) -> Self {
        Self {
            source,
            index,
            side,
        }
    }

    /// The deduplication key for a line at a level: lines sharing a key
    /// within one change render a single context block.
    pub fn dedup_key(&self, target_line: u32, level: u32) -> (Option<String>, Option<String>, u32) {
        let context = self.index.context(target_line);
        (
            context.and_then(|c| c.enclosing_class.clone()),
            context.and_then(|c| c.enclosing_function.clone()),
            level,
        )
    }

    /// Select the context block for a target line at the given level.
    ///
    /// Returns `None` only for empty source text; every non-empty file
    /// produces some block, via the window fallbacks when no definition
    /// encloses the line.
    pub fn resolve(&self, target_line: u32, level: u32) -> Option<ContextBlock> {
        if self.source.is_empty() {
            return None;
        }

        let (start, end, description) = if level >= 2 {
            (
                1,
                self.source.line_count() as u32,
                "entire file".to_owned(),
            )
        } else if level == 1 {
            self.parent_scope(target_line)
        } else {
            self.current_scope(target_line)
        };

        let start = start.max(1);
        let end = end.min(self.source.line_count() as u32);
        if start > end {
            return None;
        }

        let lines = (start..=end)
            .map(|number| {
                (
                    number,
                    self.source.line(number).unwrap_or_default().to_owned(),
                )
            })
            .collect();

        Some(ContextBlock {
            side: self.side,
            level,
            target_line,
            description,
            lines,
        })
    }

    /// Level 0: the innermost enclosing definition, else a narrow window.
    fn current_scope(&self, target_line: u32) -> (u32, u32, String) {
        match self.index.innermost_span_index(target_line) {
            Some(idx) => {
                let span = self.index.span(idx);
                let description = match span.kind {
                    ScopeKind::Function => {
                        let enclosing_class = self
                            .index
                            .context(target_line)
                            .and_then(|c| c.enclosing_class.clone());
                        match enclosing_class {
                            Some(class) => format!("function {} in class {}", span.name, class),
                            None => format!("function {}", span.name),
                        }
                    }
                    _ => format!("class {}", span.name),
                };
                (span.start_line, span.end_line, description)
            }
            None => self.window(
                target_line,
                NARROW_WINDOW,
                format!("lines around {target_line}"),
            ),
        }
    }

    /// Level 1: for a line inside a function, the enclosing class when there
    /// is one, otherwise up to three consecutive top-level definitions
    /// centered on the one containing the target; any other line gets a wide
    /// window.
    fn parent_scope(&self, target_line: u32) -> (u32, u32, String) {
        let in_function = self
            .index
            .context(target_line)
            .is_some_and(|context| context.enclosing_function.is_some());

        if let (true, Some(innermost)) = (in_function, self.index.innermost_span_index(target_line))
        {
            if let Some(class_idx) = self.index.nearest_of_kind(innermost, ScopeKind::Class) {
                let span = self.index.span(class_idx);
                return (
                    span.start_line,
                    span.end_line,
                    format!("class {} (parent context)", span.name),
                );
            }

            let root = self.index.root_ancestor(innermost);
            let tops = self.index.top_level_spans();
            let position = tops.iter().position(|idx| *idx == root).unwrap_or(0);
            let first = tops[position.saturating_sub(1)];
            let last = tops[(position + 1).min(tops.len() - 1)];
            let name = &self.index.span(root).name;
            return (
                self.index.span(first).start_line,
                self.index.span(last).end_line,
                format!("module context around function {name}"),
            );
        }

        self.window(
            target_line,
            WIDE_WINDOW,
            format!("module context around line {target_line}"),
        )
    }

    fn window(&self, target_line: u32, radius: u32, description: String) -> (u32, u32, String) {
        let start = target_line.saturating_sub(radius).max(1);
        let end = (target_line + radius).min(self.source.line_count() as u32);
        (start, end, description)
    }
}
