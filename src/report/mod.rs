//! Rendering conventions shared by the report, and the context extractor.
//!
//! Context blocks are bracketed by a fixed delimiter line and prefix every
//! source line with a fixed-width marker + line number. Consumers must treat
//! the delimiters as structural: `extract_context_lines` parses them
//! positionally to recover the raw source lines from a rendered block.

use crate::compare::{ChangeKind, ChangeRecord};

/// Width of the delimiter run bracketing a context block.
pub const DELIMITER_WIDTH: usize = 80;

/// Byte width of the per-line prefix: 4-char marker, 4-char line number, ": ".
pub const CONTEXT_PREFIX_WIDTH: usize = 10;

const TARGET_MARKER: &str = ">>> ";
const PLAIN_MARKER: &str = "    ";

/// The delimiter line bracketing a context block.
pub fn delimiter() -> String {
    "─".repeat(DELIMITER_WIDTH)
}

/// Render one numbered context line, marking the target line.
pub fn format_context_line(line_number: u32, text: &str, is_target: bool) -> String {
    let marker = if is_target { TARGET_MARKER } else { PLAIN_MARKER };
    format!("{marker}{line_number:>4}: {text}")
}

/// The rendered context block relevant to a change: the removed side for
/// deletions and replacements, the added side for insertions.
pub fn context_for_record(record: &ChangeRecord) -> Option<&str> {
    match record.kind {
        ChangeKind::Delete | ChangeKind::Replace => record.removed_context.as_deref(),
        ChangeKind::Insert => record.added_context.as_deref(),
    }
}

/// Recover the raw source lines from a rendered context block.
///
/// Slices between the first two delimiter lines and strips the fixed-width
/// line-number prefix from each interior line. Returns `None` when the text
/// does not contain a bracketed block. Purely textual: a source line that is
/// itself identical to the delimiter would end the slice early — consumers
/// that need a robust extraction should read `ChangeRecord::context_only`,
/// which is computed from the structured block instead.
pub fn extract_context_lines(rendered: &str) -> Option<String> {
    let delimiter = delimiter();
    let lines: Vec<&str> = rendered.lines().collect();
    let start = lines.iter().position(|line| *line == delimiter)?;
    let end = start
        + 1
        + lines[start + 1..]
            .iter()
            .position(|line| *line == delimiter)?;

    let inner: Vec<&str> = lines[start + 1..end]
        .iter()
        .map(|line| line.get(CONTEXT_PREFIX_WIDTH..).unwrap_or(""))
        .collect();
    Some(inner.join("\n"))
}
