use crate::cli::OutputFormat;
use crate::compare::compare_files;
use crate::error::AppError;
use std::path::Path;

pub fn run(old: &Path, new: &Path, level: u32, format: OutputFormat) -> Result<(), AppError> {
    let result = compare_files(old, new, level);

    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).expect("failed to serialize JSON output")
        );
    } else {
        println!("{}", result.full_output);
    }

    match result.error {
        Some(message) => Err(AppError::io(message)),
        None => Ok(()),
    }
}
