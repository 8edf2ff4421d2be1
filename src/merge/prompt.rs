//! Merge prompt construction and response extraction.

use super::{MergeOutcome, MergeRequest};
use regex::Regex;
use std::sync::OnceLock;

fn resolved_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)Resolved file:\s*```(?:python)?\n(.*?)```").expect("valid regex")
    })
}

fn explanation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)Explanation:\s*(.*)\z").expect("valid regex"))
}

/// Build the three-way merge prompt.
pub fn build_merge_prompt(request: &MergeRequest) -> String {
    format!(
        r#"Assume you are an expert developer.

Here are three versions of the same python file:

1. Base (common ancestor of both branches):
{base}

2. Ours (main branch):
{ours}

3. Theirs (side branch):
{theirs}

Resolve the merge by applying the side branch's changes on top of the main
branch version.

Respond in exactly this format:

Resolved file:
```python
<the merged file, or nothing at all if the conflicts cannot be resolved>
```

Explanation:
<what changed from the main branch version>"#,
        base = request.base,
        ours = request.ours,
        theirs = request.theirs
    )
}

/// Extract the merge outcome from a model response.
///
/// A missing or empty fenced block is the unresolved signal, not an error.
pub fn extract_merge_outcome(output: &str) -> MergeOutcome {
    let body = resolved_pattern()
        .captures(output)
        .map(|captures| captures[1].trim().to_owned());

    match body {
        Some(body) if !body.is_empty() => {
            let explanation = explanation_pattern()
                .captures(output)
                .map(|captures| captures[1].trim().to_owned())
                .filter(|text| !text.is_empty());
            MergeOutcome::Resolved { body, explanation }
        }
        _ => MergeOutcome::Unresolved,
    }
}
