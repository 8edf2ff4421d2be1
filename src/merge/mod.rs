//! LLM-backed three-way merge resolution.
//!
//! The resolver is an opaque text-to-text collaborator: it takes the three
//! versions of a conflicted file, asks the model to apply the side branch's
//! changes on top of the main branch, and returns the resolved body — or
//! `Unresolved` when the model signals the conflict cannot be merged.

pub mod claude;
pub mod prompt;

use futures::future::join_all;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Claude CLI not found. Install from https://claude.ai/code")]
    ClaudeNotFound,
    #[error("Merge command failed: {0}")]
    CommandFailed(String),
    #[error("Empty response from the model")]
    EmptyResponse,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The three versions of one conflicted file.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Common ancestor of the two branches.
    pub base: String,
    /// Main branch version.
    pub ours: String,
    /// Side branch version.
    pub theirs: String,
}

impl MergeRequest {
    pub fn from_paths(base: &Path, ours: &Path, theirs: &Path) -> Result<Self, MergeError> {
        Ok(Self {
            base: fs::read_to_string(base)?,
            ours: fs::read_to_string(ours)?,
            theirs: fs::read_to_string(theirs)?,
        })
    }
}

/// The result of one resolution attempt. `Unresolved` is a signal, not an
/// error: the model answered but declined to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Resolved {
        body: String,
        explanation: Option<String>,
    },
    Unresolved,
}

impl MergeOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Resolved { body, .. } => Some(body),
            Self::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Model to use (e.g., sonnet, haiku, opus).
    pub model: String,
    /// Custom command overriding the claude CLI; receives the prompt as its
    /// final argument.
    pub custom_command: Option<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            model: "sonnet".to_owned(),
            custom_command: None,
        }
    }
}

/// Resolve one three-way conflict.
///
/// When the two branch versions are identical there is nothing to merge and
/// `ours` is returned without consulting the model.
pub fn resolve(request: &MergeRequest, options: &MergeOptions) -> Result<MergeOutcome, MergeError> {
    if request.ours == request.theirs {
        return Ok(MergeOutcome::Resolved {
            body: request.ours.clone(),
            explanation: None,
        });
    }

    let merge_prompt = prompt::build_merge_prompt(request);
    let output = claude::run_claude(
        &merge_prompt,
        &options.model,
        options.custom_command.as_deref(),
    )?;
    Ok(prompt::extract_merge_outcome(&output))
}

/// Resolve several independent conflicts concurrently.
///
/// Each request runs the blocking CLI call on a blocking thread, capped by a
/// semaphore. Results come back in request order; a failed request does not
/// abort the others.
pub async fn resolve_many(
    requests: Vec<MergeRequest>,
    options: MergeOptions,
    max_concurrent: usize,
) -> Vec<Result<MergeOutcome, MergeError>> {
    if requests.is_empty() {
        return Vec::new();
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let options = Arc::new(options);

    let tasks: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let sem = Arc::clone(&semaphore);
            let opts = Arc::clone(&options);
            tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed unexpectedly");
                tokio::task::spawn_blocking(move || resolve(&request, &opts))
                    .await
                    .map_err(|err| MergeError::CommandFailed(format!("task join error: {err}")))?
            })
        })
        .collect();

    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok(result) => result,
            Err(err) => Err(MergeError::CommandFailed(format!("task join error: {err}"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial_request() -> MergeRequest {
        MergeRequest {
            base: "x = 1\n".to_owned(),
            ours: "x = 2\n".to_owned(),
            theirs: "x = 2\n".to_owned(),
        }
    }

    #[test]
    fn test_identical_branches_short_circuit() {
        let outcome = resolve(&trivial_request(), &MergeOptions::default()).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Resolved {
                body: "x = 2\n".to_owned(),
                explanation: None,
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_many_preserves_request_order() {
        let requests = vec![trivial_request(), trivial_request()];
        let outcomes = resolve_many(requests, MergeOptions::default(), 2).await;
        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            assert!(outcome.unwrap().is_resolved());
        }
    }

    #[tokio::test]
    async fn test_resolve_many_with_no_requests() {
        let outcomes = resolve_many(Vec::new(), MergeOptions::default(), 4).await;
        assert!(outcomes.is_empty());
    }
}
