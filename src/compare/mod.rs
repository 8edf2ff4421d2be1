//! Aggregation of diff opcodes and scope context into a structured result.
//!
//! A compare operation is a pure function of its two input texts and the
//! requested level: both scope indexes are built once, the opcode sequence is
//! computed once, and every non-equal opcode becomes a `ChangeRecord` with
//! rendered line and context blocks. Unreadable or empty inputs produce an
//! error-carrying empty result, never a panic or an `Err`.

pub mod summary;

use crate::context::{ContextBlock, ContextResolver, Side};
use crate::diff::engine::diff_lines;
use crate::diff::{OpKind, Opcode};
use crate::scope::ScopeIndex;
use crate::source::SourceText;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;
use summary::DiffStats;

/// Literal summary used when the opcode sequence contains no edits.
pub const NO_DIFFERENCES: &str = "No differences found!";

/// The kind of a change record. `Equal` opcodes never become records, so the
/// taxonomy reaching downstream consumers is closed over these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Delete,
    Replace,
}

impl ChangeKind {
    fn from_op(kind: OpKind) -> Option<Self> {
        match kind {
            OpKind::Equal => None,
            OpKind::Insert => Some(Self::Insert),
            OpKind::Delete => Some(Self::Delete),
            OpKind::Replace => Some(Self::Replace),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::Replace => "REPLACE",
        }
    }
}

/// One non-equal edit with its rendered line and context blocks.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    /// Stable id derived from the change kind, content, and position.
    pub id: String,
    pub kind: ChangeKind,
    #[serde(rename = "oldRange")]
    pub old_range: Range<usize>,
    #[serde(rename = "newRange")]
    pub new_range: Range<usize>,
    #[serde(rename = "removedContent")]
    pub removed_content: Option<String>,
    #[serde(rename = "addedContent")]
    pub added_content: Option<String>,
    #[serde(rename = "removedContext")]
    pub removed_context: Option<String>,
    #[serde(rename = "addedContext")]
    pub added_context: Option<String>,
    /// Raw contextual source lines, without report markup. Computed from the
    /// structured blocks, so it stays correct even when the source itself
    /// contains report delimiter text.
    #[serde(rename = "contextOnly")]
    pub context_only: String,
    /// The change as it appears in the full text report.
    pub formatted: String,
}

/// The terminal artifact of a compare operation.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResult {
    pub header: String,
    pub changes: Vec<ChangeRecord>,
    pub summary: String,
    #[serde(rename = "fullOutput")]
    pub full_output: String,
    pub stats: Option<DiffStats>,
    #[serde(rename = "oldSyntaxError")]
    pub old_syntax_error: bool,
    #[serde(rename = "newSyntaxError")]
    pub new_syntax_error: bool,
    /// Set when the inputs could not be compared at all.
    pub error: Option<String>,
}

impl DiffResult {
    fn failed(message: String) -> Self {
        Self {
            header: message.clone(),
            changes: Vec::new(),
            summary: String::new(),
            full_output: message.clone(),
            stats: None,
            old_syntax_error: false,
            new_syntax_error: false,
            error: Some(message),
        }
    }
}

/// Compare two files on disk.
///
/// An unreadable or empty file yields an error-carrying empty result; the
/// message names the offending path.
pub fn compare_files(old_path: &Path, new_path: &Path, level: u32) -> DiffResult {
    let old_content = read_input(old_path);
    let new_content = read_input(new_path);
    match (old_content, new_content) {
        (Ok(old), Ok(new)) => compare_sources_labeled(
            &old,
            &new,
            level,
            &old_path.display().to_string(),
            &new_path.display().to_string(),
        ),
        (old, new) => {
            let mut message = String::from("Could not read one or both files");
            for issue in [old.err(), new.err()].into_iter().flatten() {
                message.push_str("\n  ");
                message.push_str(&issue);
            }
            DiffResult::failed(message)
        }
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    match fs::read_to_string(path) {
        Ok(content) if content.is_empty() => Err(format!("{}: file is empty", path.display())),
        Ok(content) => Ok(content),
        Err(err) => Err(format!("{}: {err}", path.display())),
    }
}

/// Compare two in-memory texts.
pub fn compare_sources(old: &str, new: &str, level: u32) -> DiffResult {
    compare_sources_labeled(old, new, level, "old", "new")
}

pub fn compare_sources_labeled(
    old: &str,
    new: &str,
    level: u32,
    old_label: &str,
    new_label: &str,
) -> DiffResult {
    let old_source = SourceText::new(old);
    let new_source = SourceText::new(new);
    let old_index = ScopeIndex::build(&old_source);
    let new_index = ScopeIndex::build(&new_source);

    let mut header_lines = vec![
        "Analyzing file structure...".to_owned(),
        String::new(),
        "Comparing:".to_owned(),
        format!("  Old: {old_label}"),
        format!("  New: {new_label}"),
        format!("  Context level: {level}"),
    ];
    if old_index.syntax_error {
        header_lines.push(format!(
            "  warning: {old_label} has syntax errors; scope attribution degraded to module level"
        ));
    }
    if new_index.syntax_error {
        header_lines.push(format!(
            "  warning: {new_label} has syntax errors; scope attribution degraded to module level"
        ));
    }
    header_lines.push("=".repeat(60));
    let header = header_lines.join("\n");

    let opcodes = diff_lines(old_source.lines(), new_source.lines());

    let old_resolver = ContextResolver::new(&old_source, &old_index, Side::Old);
    let new_resolver = ContextResolver::new(&new_source, &new_index, Side::New);

    let mut changes = Vec::new();
    let mut output_lines = vec![header.clone()];

    for op in &opcodes {
        let Some(kind) = ChangeKind::from_op(op.kind) else {
            continue;
        };

        let mut formatted = vec![
            format!(
                "\n{} at lines {}-{} -> {}-{}",
                kind.label(),
                op.old_range.start + 1,
                op.old_range.end,
                op.new_range.start + 1,
                op.new_range.end
            ),
            "-".repeat(40),
        ];

        let mut removed = RenderedSide::default();
        if matches!(kind, ChangeKind::Delete | ChangeKind::Replace) {
            formatted.push("REMOVED:".to_owned());
            removed = render_side(&old_resolver, &old_source, &op.old_range, level);
            formatted.extend(removed.formatted.iter().cloned());
        }

        let mut added = RenderedSide::default();
        if matches!(kind, ChangeKind::Insert | ChangeKind::Replace) {
            formatted.push("ADDED:".to_owned());
            added = render_side(&new_resolver, &new_source, &op.new_range, level);
            formatted.extend(added.formatted.iter().cloned());
        }

        // The context-only extraction follows the side a reader diffs
        // against: the old side for deletions and replacements, the new side
        // for insertions.
        let relevant_blocks = match kind {
            ChangeKind::Insert => &added.blocks,
            ChangeKind::Delete | ChangeKind::Replace => &removed.blocks,
        };
        let context_only = relevant_blocks
            .iter()
            .map(ContextBlock::raw_text)
            .collect::<Vec<_>>()
            .join("\n\n");

        let formatted = formatted.join("\n");
        output_lines.push(formatted.clone());

        changes.push(ChangeRecord {
            id: change_id(kind, &old_source, &new_source, op),
            kind,
            old_range: op.old_range.clone(),
            new_range: op.new_range.clone(),
            removed_content: removed.content,
            added_content: added.content,
            removed_context: removed.context,
            added_context: added.context,
            context_only,
            formatted,
        });
    }

    let stats = DiffStats::collect(&old_source, &new_source, &old_index, &new_index);
    let summary = if changes.is_empty() {
        NO_DIFFERENCES.to_owned()
    } else {
        stats.render()
    };
    output_lines.push(summary.clone());

    DiffResult {
        header,
        changes,
        summary,
        full_output: output_lines.join("\n"),
        stats: Some(stats),
        old_syntax_error: old_index.syntax_error,
        new_syntax_error: new_index.syntax_error,
        error: None,
    }
}

#[derive(Default)]
struct RenderedSide {
    formatted: Vec<String>,
    content: Option<String>,
    context: Option<String>,
    blocks: Vec<ContextBlock>,
}

/// Render one side of a change: its numbered lines plus deduplicated context
/// blocks. Lines resolving to the same (class, function, level) key share a
/// single block, anchored at the first such line.
fn render_side(
    resolver: &ContextResolver<'_>,
    source: &SourceText,
    range: &Range<usize>,
    level: u32,
) -> RenderedSide {
    let mut formatted = Vec::new();
    let mut content_lines = Vec::new();
    let mut context_strings = Vec::new();
    let mut blocks = Vec::new();
    let mut contexts_shown: HashSet<(Option<String>, Option<String>, u32)> = HashSet::new();

    for position in range.clone() {
        let line_number = position as u32 + 1;
        let text = source.line(line_number).unwrap_or_default();
        let line = format!("  {line_number:>3}: {text}");
        content_lines.push(line.clone());
        formatted.push(line);

        if contexts_shown.insert(resolver.dedup_key(line_number, level)) {
            if let Some(block) = resolver.resolve(line_number, level) {
                let rendered = block.render();
                formatted.push(rendered.clone());
                context_strings.push(rendered);
                blocks.push(block);
            }
        }
    }

    RenderedSide {
        formatted,
        content: (!content_lines.is_empty()).then(|| content_lines.join("\n")),
        context: (!context_strings.is_empty()).then(|| context_strings.join("\n")),
        blocks,
    }
}

/// Content hash id: kind plus a truncated digest of the changed lines and
/// their position, stable across runs.
fn change_id(
    kind: ChangeKind,
    old_source: &SourceText,
    new_source: &SourceText,
    op: &Opcode,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.label().as_bytes());
    hasher.update([0u8]);
    for line in &old_source.lines()[op.old_range.clone()] {
        hasher.update(line.as_bytes());
        hasher.update([b'\n']);
    }
    hasher.update([0u8]);
    for line in &new_source.lines()[op.new_range.clone()] {
        hasher.update(line.as_bytes());
        hasher.update([b'\n']);
    }
    hasher.update(op.old_range.start.to_le_bytes());
    hasher.update(op.new_range.start.to_le_bytes());
    let hash = hex::encode(&hasher.finalize()[..8]);
    format!("{}:{hash}", kind.label().to_lowercase())
}
