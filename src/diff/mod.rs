//! Line-level diffing between two versions of a file.

pub mod engine;

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Classification of one edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One edit operation over half-open, 0-indexed line ranges.
///
/// The opcode sequence for a pair of files partitions both sides: old ranges
/// are contiguous over `[0, old_len)` and new ranges over `[0, new_len)`,
/// with no gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub kind: OpKind,
    #[serde(rename = "oldRange")]
    pub old_range: Range<usize>,
    #[serde(rename = "newRange")]
    pub new_range: Range<usize>,
}
