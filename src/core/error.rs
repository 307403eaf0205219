//! Workflow error types.
//!
//! The `Display` text of every variant is the message shown to the caller of a
//! tool, so variants carry enough context to be read on their own.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that can occur while running a workflow operation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Required workflow artifacts are missing.
    #[error(
        "Workflow not properly initialized. Missing files:\n{}\n\nPlease run init-workflow first to set up the complete workflow structure.",
        format_missing(.missing)
    )]
    NotInitialized { missing: Vec<String> },

    /// The workspace already has a workflow configuration.
    #[error("Workflow already initialized. Edit .cycles-config.json to modify settings.")]
    AlreadyInitialized,

    /// The workflow configuration is unreadable or fails validation.
    #[error("Invalid configuration: {0}. Please run init-workflow again.")]
    InvalidConfig(String),

    /// A tool parameter that is required in this context was not supplied.
    #[error("Error: {0}")]
    MissingParameter(String),

    /// Tool arguments could not be decoded.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// No cycle directory with the given number exists.
    #[error("Cycle {0} not found. Create it first with create-cycle.")]
    CycleNotFound(String),

    /// A document the operation depends on does not exist.
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// No pending checklist entry exists for the task.
    #[error("Task {0} not found or already completed.")]
    TaskNotFound(String),

    /// Refusing to operate on a protected branch.
    #[error("Cannot push directly to {0}. Create a feature branch first.")]
    ProtectedBranch(String),

    /// HEAD does not point at a branch.
    #[error("Could not determine the current branch (detached HEAD or not a git repository)")]
    NoBranch,

    /// A version-control or PR-hosting command failed.
    #[error("{operation} failed: {message}")]
    Command { operation: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkflowError {
    /// Build a [`WorkflowError::Command`] from an operation name and message.
    pub fn command(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command { operation: operation.into(), message: message.into() }
    }

    /// Whether this error means "something the caller asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CycleNotFound(_) | Self::TaskNotFound(_) | Self::DocumentNotFound(_))
    }
}

fn format_missing(missing: &[String]) -> String {
    missing.iter().map(|m| format!("  - {m}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_lists_missing_files() {
        let err = WorkflowError::NotInitialized {
            missing: vec![".cycles-config.json".to_string(), "WORKFLOW.md".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("  - .cycles-config.json\n  - WORKFLOW.md"));
        assert!(message.contains("run init-workflow first"));
    }

    #[test]
    fn test_task_not_found_message() {
        let err = WorkflowError::TaskNotFound("004".to_string());
        assert_eq!(err.to_string(), "Task 004 not found or already completed.");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_command_error() {
        let err = WorkflowError::command("Commit", "nothing to commit");
        assert_eq!(err.to_string(), "Commit failed: nothing to commit");
        assert!(!err.is_not_found());
    }
}
