use crate::cli::OutputFormat;
use crate::error::AppError;
use crate::merge::{self, claude, MergeOptions, MergeOutcome, MergeRequest};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Resolve one three-way conflict. Returns the process exit code:
/// 0 when resolved, 1 when the model declines to merge.
pub fn run(
    base: &Path,
    ours: &Path,
    theirs: &Path,
    output: Option<&Path>,
    model: &str,
    llm_command: Option<String>,
    format: OutputFormat,
) -> Result<i32, AppError> {
    if llm_command.is_none() && !claude::check_claude_available() {
        return Err(AppError::merge(
            "Claude CLI not found. Please install: npm install -g @anthropic-ai/claude-code",
        ));
    }

    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|err| AppError::io(format!("{}: {err}", path.display())))
    };
    let request = MergeRequest {
        base: read(base)?,
        ours: read(ours)?,
        theirs: read(theirs)?,
    };
    let options = MergeOptions {
        model: model.to_owned(),
        custom_command: llm_command,
    };

    let rt = tokio::runtime::Runtime::new().map_err(|err| AppError::io(err.to_string()))?;
    let mut outcomes = rt.block_on(merge::resolve_many(vec![request], options, 1));
    let outcome = outcomes
        .pop()
        .unwrap_or(Err(merge::MergeError::EmptyResponse))?;

    match outcome {
        MergeOutcome::Resolved { body, explanation } => {
            match output {
                Some(path) => {
                    fs::write(path, &body)
                        .map_err(|err| AppError::io(format!("{}: {err}", path.display())))?;
                    if format == OutputFormat::Json {
                        println!(
                            "{}",
                            serde_json::json!({
                                "resolved": true,
                                "output": path.display().to_string(),
                                "explanation": explanation,
                            })
                        );
                    } else {
                        println!("{} Resolved -> {}", "✓".green(), path.display());
                        if let Some(text) = explanation {
                            println!("{text}");
                        }
                    }
                }
                None => {
                    if format == OutputFormat::Json {
                        println!(
                            "{}",
                            serde_json::json!({
                                "resolved": true,
                                "body": body,
                                "explanation": explanation,
                            })
                        );
                    } else {
                        print!("{body}");
                    }
                }
            }
            Ok(0)
        }
        MergeOutcome::Unresolved => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "resolved": false }));
            } else {
                eprintln!("{} Unresolved: conflicts need manual attention", "✗".red());
            }
            Ok(1)
        }
    }
}
