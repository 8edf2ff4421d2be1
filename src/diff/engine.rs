//! LCS edit-script computation, a thin wrapper over `similar`.

use super::{OpKind, Opcode};
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Compute the opcode sequence aligning `old` against `new`.
///
/// Identical inputs short-circuit to a single `Equal` opcode over the full
/// range without running the alignment.
pub fn diff_lines(old: &[String], new: &[String]) -> Vec<Opcode> {
    if old == new {
        return vec![Opcode {
            kind: OpKind::Equal,
            old_range: 0..old.len(),
            new_range: 0..new.len(),
        }];
    }

    let opcodes: Vec<Opcode> = capture_diff_slices(Algorithm::Myers, old, new)
        .iter()
        .map(|op| Opcode {
            kind: match op.tag() {
                DiffTag::Equal => OpKind::Equal,
                DiffTag::Insert => OpKind::Insert,
                DiffTag::Delete => OpKind::Delete,
                DiffTag::Replace => OpKind::Replace,
            },
            old_range: op.old_range(),
            new_range: op.new_range(),
        })
        .collect();

    log::debug!(
        "diff produced {} opcode(s) over {}/{} lines",
        opcodes.len(),
        old.len(),
        new.len()
    );
    opcodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    /// Opcode ranges must partition both sides with no gaps or overlaps.
    fn assert_partition(opcodes: &[Opcode], old_len: usize, new_len: usize) {
        let mut old_cursor = 0;
        let mut new_cursor = 0;
        for op in opcodes {
            assert_eq!(op.old_range.start, old_cursor);
            assert_eq!(op.new_range.start, new_cursor);
            old_cursor = op.old_range.end;
            new_cursor = op.new_range.end;
        }
        assert_eq!(old_cursor, old_len);
        assert_eq!(new_cursor, new_len);
    }

    #[test]
    fn test_identical_inputs_yield_single_equal_opcode() {
        let a = lines(&["x", "y", "z"]);
        let opcodes = diff_lines(&a, &a);
        assert_eq!(opcodes.len(), 1);
        assert_eq!(opcodes[0].kind, OpKind::Equal);
        assert_eq!(opcodes[0].old_range, 0..3);
        assert_eq!(opcodes[0].new_range, 0..3);
    }

    #[test]
    fn test_empty_inputs() {
        let opcodes = diff_lines(&[], &[]);
        assert_eq!(opcodes.len(), 1);
        assert_eq!(opcodes[0].kind, OpKind::Equal);
        assert_partition(&opcodes, 0, 0);
    }

    #[test]
    fn test_single_line_replace() {
        let old = lines(&["def f():", "    x = 1", "    y = 2", "    return x + y", ""]);
        let new = lines(&["def f():", "    x = 1", "    y = 3", "    return x + y", ""]);
        let opcodes = diff_lines(&old, &new);
        assert_partition(&opcodes, 5, 5);

        let replaces: Vec<&Opcode> = opcodes
            .iter()
            .filter(|op| op.kind == OpKind::Replace)
            .collect();
        assert_eq!(replaces.len(), 1);
        assert_eq!(replaces[0].old_range, 2..3);
        assert_eq!(replaces[0].new_range, 2..3);
    }

    #[test]
    fn test_partition_with_mixed_edits() {
        let old = lines(&["a", "b", "c", "d", "e"]);
        let new = lines(&["a", "x", "c", "e", "f", "g"]);
        let opcodes = diff_lines(&old, &new);
        assert_partition(&opcodes, old.len(), new.len());
        assert!(opcodes.iter().any(|op| op.kind != OpKind::Equal));
    }

    #[test]
    fn test_pure_insert_has_empty_old_range() {
        let old = lines(&["a", "b"]);
        let new = lines(&["a", "b", "c"]);
        let opcodes = diff_lines(&old, &new);
        assert_partition(&opcodes, 2, 3);
        let insert = opcodes
            .iter()
            .find(|op| op.kind == OpKind::Insert)
            .expect("insert opcode");
        assert!(insert.old_range.is_empty());
        assert_eq!(insert.new_range, 2..3);
    }
}
