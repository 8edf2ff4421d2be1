//! End-to-end compare tests over real files on disk.

use scopediff::compare::{compare_files, ChangeKind, NO_DIFFERENCES};
use scopediff::report::{context_for_record, extract_context_lines};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

const OLD_FN: &str = "def f():\n    x = 1\n    y = 2\n    return x + y\n";
const NEW_FN: &str = "def f():\n    x = 1\n    y = 3\n    return x + y\n";

#[test]
fn test_replace_inside_module_function() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let new = write_fixture(&dir, "new.py", NEW_FN);

    let result = compare_files(&old, &new, 0);
    assert!(result.error.is_none());
    assert_eq!(result.changes.len(), 1);

    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::Replace);
    assert_eq!(change.old_range, 2..3);
    assert_eq!(change.new_range, 2..3);

    let stats = result.stats.as_ref().unwrap();
    assert_eq!(stats.old_line_count, 5);
    assert_eq!(stats.new_line_count, 5);
    assert_eq!(stats.line_delta, 0);

    // Both sides resolve to the span of f, with the changed line marked.
    let removed = change.removed_context.as_deref().unwrap();
    assert!(removed.contains("function f"));
    assert!(removed.contains(">>>    3:     y = 2"));
    let added = change.added_context.as_deref().unwrap();
    assert!(added.contains(">>>    3:     y = 3"));
}

#[test]
fn test_identical_files_report_no_differences() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let new = write_fixture(&dir, "new.py", OLD_FN);

    let result = compare_files(&old, &new, 0);
    assert!(result.changes.is_empty());
    assert_eq!(result.summary, NO_DIFFERENCES);
}

#[test]
fn test_added_function_appears_as_insert() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let new = write_fixture(
        &dir,
        "new.py",
        "def f():\n    x = 1\n    y = 2\n    return x + y\n\ndef g():\n    return 0\n",
    );

    let result = compare_files(&old, &new, 0);
    assert!(result
        .changes
        .iter()
        .any(|change| change.kind == ChangeKind::Insert));
    let stats = result.stats.as_ref().unwrap();
    assert_eq!(stats.added_functions, vec!["g".to_owned()]);
    assert!(stats.removed_functions.is_empty());
}

#[test]
fn test_missing_file_produces_error_result() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let missing = dir.path().join("nope.py");

    let result = compare_files(&old, &missing, 0);
    assert!(result.error.is_some());
    assert!(result.changes.is_empty());
    assert!(result.header.contains("Could not read one or both files"));
    assert!(result.full_output.contains("nope.py"));
}

#[test]
fn test_empty_file_produces_error_result() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", "");
    let new = write_fixture(&dir, "new.py", NEW_FN);

    let result = compare_files(&old, &new, 0);
    assert!(result.error.is_some());
    assert!(result.full_output.contains("file is empty"));
}

#[test]
fn test_syntax_error_degrades_without_failing() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", "def broken(:\n    x = 1\n");
    let new = write_fixture(&dir, "new.py", "def broken(:\n    x = 2\n");

    let result = compare_files(&old, &new, 0);
    assert!(result.error.is_none());
    assert!(result.old_syntax_error);
    assert!(result.header.contains("syntax errors"));
    assert_eq!(result.changes.len(), 1);
}

#[test]
fn test_rendered_context_roundtrips_through_extraction() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let new = write_fixture(&dir, "new.py", NEW_FN);

    let result = compare_files(&old, &new, 0);
    let change = &result.changes[0];

    // The textual extraction from the rendered block agrees with the
    // structured context_only field.
    let rendered = context_for_record(change).unwrap();
    let extracted = extract_context_lines(rendered).unwrap();
    assert_eq!(extracted, change.context_only);
    assert_eq!(
        extracted,
        "def f():\n    x = 1\n    y = 2\n    return x + y"
    );
}

#[test]
fn test_whole_file_level_is_a_superset() {
    let dir = TempDir::new().unwrap();
    let old = write_fixture(&dir, "old.py", OLD_FN);
    let new = write_fixture(&dir, "new.py", NEW_FN);

    let scoped = compare_files(&old, &new, 0);
    let whole = compare_files(&old, &new, 2);

    let scoped_context = scoped.changes[0].context_only.clone();
    let whole_context = whole.changes[0].context_only.clone();
    assert!(whole.changes[0]
        .removed_context
        .as_deref()
        .unwrap()
        .contains("entire file"));
    assert!(whole_context.len() >= scoped_context.len());
}
