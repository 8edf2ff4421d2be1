//! scopediff — scope-aware structural diff for Python sources.
//!
//! Compares two versions of a file, attributes every changed line range to
//! its enclosing class or function, and renders a context-annotated report
//! at a caller-selected granularity (0 = innermost scope, 1 = parent scope,
//! 2+ = whole file). A separate merge module resolves three-way conflicts
//! through an LLM backend and powers the git merge driver binary.

#[cfg(feature = "cli")]
pub mod cli;
pub mod compare;
pub mod context;
pub mod diff;
pub mod error;
pub mod merge;
pub mod report;
pub mod scope;
pub mod source;

pub use compare::{compare_files, compare_sources, ChangeKind, ChangeRecord, DiffResult};
pub use context::{ContextBlock, ContextResolver, Side};
pub use diff::engine::diff_lines;
pub use diff::{OpKind, Opcode};
pub use error::AppError;
pub use scope::{LineContext, ScopeIndex, ScopeKind, ScopeSpan};
pub use source::SourceText;
