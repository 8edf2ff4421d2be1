//! Summary statistics for a comparison.

use crate::scope::ScopeIndex;
use crate::source::SourceText;
use serde::Serialize;
use std::collections::BTreeSet;

/// Line and definition counts for the two sides of a comparison.
///
/// Name sets are scope-blind: a function with the same name under a
/// different class counts as the same function.
#[derive(Debug, Clone, Serialize)]
pub struct DiffStats {
    #[serde(rename = "oldLineCount")]
    pub old_line_count: usize,
    #[serde(rename = "newLineCount")]
    pub new_line_count: usize,
    #[serde(rename = "lineDelta")]
    pub line_delta: i64,
    #[serde(rename = "oldFunctionCount")]
    pub old_function_count: usize,
    #[serde(rename = "newFunctionCount")]
    pub new_function_count: usize,
    #[serde(rename = "oldClassCount")]
    pub old_class_count: usize,
    #[serde(rename = "newClassCount")]
    pub new_class_count: usize,
    #[serde(rename = "addedFunctions")]
    pub added_functions: Vec<String>,
    #[serde(rename = "removedFunctions")]
    pub removed_functions: Vec<String>,
}

impl DiffStats {
    pub fn collect(
        old_source: &SourceText,
        new_source: &SourceText,
        old_index: &ScopeIndex,
        new_index: &ScopeIndex,
    ) -> Self {
        let old_functions = function_names(old_index);
        let new_functions = function_names(new_index);
        let old_classes = class_names(old_index);
        let new_classes = class_names(new_index);

        Self {
            old_line_count: old_source.line_count(),
            new_line_count: new_source.line_count(),
            line_delta: new_source.line_count() as i64 - old_source.line_count() as i64,
            old_function_count: old_functions.len(),
            new_function_count: new_functions.len(),
            old_class_count: old_classes.len(),
            new_class_count: new_classes.len(),
            added_functions: new_functions.difference(&old_functions).cloned().collect(),
            removed_functions: old_functions.difference(&new_functions).cloned().collect(),
        }
    }

    pub fn render(&self) -> String {
        let bar = "=".repeat(60);
        let mut out = vec![
            format!("\n{bar}"),
            "SUMMARY".to_owned(),
            bar.clone(),
            format!("Old file: {} lines", self.old_line_count),
            format!("New file: {} lines", self.new_line_count),
            format!("Difference: {:+} lines", self.line_delta),
            format!(
                "Functions: {} -> {}",
                self.old_function_count, self.new_function_count
            ),
            format!("Classes: {} -> {}", self.old_class_count, self.new_class_count),
        ];
        if !self.added_functions.is_empty() {
            out.push(format!(
                "Added functions: {}",
                self.added_functions.join(", ")
            ));
        }
        if !self.removed_functions.is_empty() {
            out.push(format!(
                "Removed functions: {}",
                self.removed_functions.join(", ")
            ));
        }
        out.join("\n")
    }
}

/// Distinct function names referenced anywhere in a side's line contexts.
fn function_names(index: &ScopeIndex) -> BTreeSet<String> {
    index
        .line_contexts
        .iter()
        .filter_map(|context| context.enclosing_function.clone())
        .collect()
}

fn class_names(index: &ScopeIndex) -> BTreeSet<String> {
    index
        .line_contexts
        .iter()
        .filter_map(|context| context.enclosing_class.clone())
        .collect()
}
