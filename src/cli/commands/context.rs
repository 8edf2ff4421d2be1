use crate::cli::OutputFormat;
use crate::compare::compare_files;
use crate::error::AppError;
use std::path::Path;

/// Print only the contextual source for each change — the compact
/// what-changed-in-context stream downstream prompts consume.
pub fn run(old: &Path, new: &Path, level: u32, format: OutputFormat) -> Result<(), AppError> {
    let result = compare_files(old, new, level);

    if let Some(message) = result.error {
        return Err(AppError::io(message));
    }

    if format == OutputFormat::Json {
        let entries: Vec<serde_json::Value> = result
            .changes
            .iter()
            .map(|change| {
                serde_json::json!({
                    "id": change.id,
                    "kind": change.kind,
                    "contextOnly": change.context_only,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).expect("failed to serialize JSON output")
        );
    } else {
        for change in &result.changes {
            if !change.context_only.is_empty() {
                println!("{}", change.context_only);
                println!();
            }
        }
    }

    Ok(())
}
