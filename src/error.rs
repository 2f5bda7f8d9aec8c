//! Rich diagnostic error types for taskling.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes, help text, and source chains so users know
//! exactly what went wrong and how to fix it.
//!
//! Command parsing deliberately has no error type: the parser always returns
//! a usable (if imperfect) result, so only the store and the classifier
//! loader can fail.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for taskling.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TasklingError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Classify(#[from] ClassifyError),
}

/// Result type for top-level operations.
pub type TasklingResult<T> = std::result::Result<T, TasklingError>;

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(taskling::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(taskling::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             This may indicate corruption — try running with a fresh data directory. \
             If the problem persists, file a bug report."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(taskling::store::serde),
        help(
            "Failed to serialize or deserialize a task record. \
             This usually means the stored data format has changed between versions. \
             Try re-adding your tasks with a fresh data directory."
        )
    )]
    Serialization { message: String },

    #[error("a task named \"{name}\" already exists")]
    #[diagnostic(
        code(taskling::store::duplicate_name),
        help(
            "Task names are unique, compared case-insensitively. \
             Mark the existing task as done or delete it first."
        )
    )]
    DuplicateName { name: String },

    #[error("task not found: \"{wanted}\"")]
    #[diagnostic(
        code(taskling::store::not_found),
        help("No task matches that name or id. List tasks to see what exists.")
    )]
    NotFound { wanted: String },
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClassifyError {
    #[error("malformed classifier model at {path}: {message}")]
    #[diagnostic(
        code(taskling::classify::malformed),
        help(
            "The model artifact could not be parsed as a taskling naive-Bayes \
             JSON model. Re-export the model or remove the file; the parser \
             works without it, falling back to rule-derived defaults."
        )
    )]
    MalformedModel { path: String, message: String },

    #[error("classifier model defines no classes")]
    #[diagnostic(
        code(taskling::classify::empty),
        help("A model must define at least one class label to predict anything.")
    )]
    EmptyModel,

    #[error("classifier table \"{table}\" has {actual} entries, expected {expected}")]
    #[diagnostic(
        code(taskling::classify::table_mismatch),
        help(
            "Every per-class table in the model must have exactly one entry per \
             class. The artifact is inconsistent; re-export the model."
        )
    )]
    TableMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
}
