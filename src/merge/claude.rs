//! Claude CLI invocation for merge resolution.

use super::MergeError;
use std::process::Command;

/// Check if the claude CLI is available.
pub fn check_claude_available() -> bool {
    find_claude_executable().is_some()
}

/// Find the claude executable in PATH.
pub(crate) fn find_claude_executable() -> Option<String> {
    let candidates = if cfg!(target_os = "windows") {
        vec!["claude.exe", "claude.cmd", "claude.bat"]
    } else {
        vec!["claude"]
    };

    for candidate in candidates {
        let which_cmd = if cfg!(target_os = "windows") {
            "where"
        } else {
            "which"
        };

        if let Ok(output) = Command::new(which_cmd).arg(candidate).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_owned();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }
    }

    None
}

/// Run the claude CLI with the given prompt and model, or a custom command.
///
/// # Security Warning
///
/// The `custom_command` parameter allows arbitrary command execution. It is
/// intentionally provided so users can plug in alternative model backends,
/// but it must only come from trusted configuration. The prompt is passed as
/// a final argument, not through a shell.
pub(crate) fn run_claude(
    prompt: &str,
    model: &str,
    custom_command: Option<&str>,
) -> Result<String, MergeError> {
    let output = if let Some(cmd) = custom_command {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        if parts.is_empty() {
            return Err(MergeError::CommandFailed(
                "Custom command is empty".to_owned(),
            ));
        }
        let program = parts[0];
        let mut args: Vec<&str> = parts[1..].to_vec();
        args.push(prompt);

        Command::new(program)
            .args(&args)
            .output()
            .map_err(|err| MergeError::CommandFailed(err.to_string()))?
    } else {
        let claude_path = find_claude_executable().ok_or(MergeError::ClaudeNotFound)?;

        Command::new(&claude_path)
            .args(["--print", "--model", model, "-p", prompt])
            .output()
            .map_err(|err| MergeError::CommandFailed(err.to_string()))?
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MergeError::CommandFailed(stderr.to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(MergeError::EmptyResponse);
    }

    Ok(stdout)
}
