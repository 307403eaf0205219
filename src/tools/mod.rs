//! Workflow tools.
//!
//! Each tool takes JSON arguments, performs one workflow operation and
//! answers with text. Failures never escape as faults: the dispatcher turns
//! every error into an error result carrying the error's message.

mod add_task;
mod create_cycle;
mod git_workflow;
mod init_workflow;
mod update_progress;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use add_task::{add_task, AddTaskArgs};
pub use create_cycle::{create_cycle, CreateCycleArgs};
pub use git_workflow::{commit_task, create_pr, push_branch, CommitTaskArgs, CreatePrArgs, PushBranchArgs};
pub use init_workflow::{init_workflow, InitWorkflowArgs};
pub use update_progress::{update_progress, UpdateProgressArgs};

use crate::core::{CommandRunner, Result, ServerConfig, WorkflowError};
use crate::workflow::DocumentStore;

/// Names of every tool, in listing order.
pub const TOOL_NAMES: [&str; 7] = [
    "init-workflow",
    "create-cycle",
    "add-task",
    "commit-task",
    "push-branch",
    "create-pr",
    "update-progress",
];

/// Collaborators shared by every tool call.
pub struct ToolContext<'a> {
    pub store: &'a dyn DocumentStore,
    pub runner: &'a dyn CommandRunner,
    pub config: &'a ServerConfig,
}

/// Text answer of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Run tool `name` with `arguments`.
pub fn call_tool(ctx: &ToolContext<'_>, name: &str, arguments: Value) -> ToolOutput {
    tracing::debug!(tool = name, "Calling tool");

    let result = match name {
        "init-workflow" => parse_args(name, arguments).and_then(|args| init_workflow(ctx, args)),
        "create-cycle" => parse_args(name, arguments).and_then(|args| create_cycle(ctx, args)),
        "add-task" => parse_args(name, arguments).and_then(|args| add_task(ctx, args)),
        "commit-task" => parse_args(name, arguments).and_then(|args| commit_task(ctx, args)),
        "push-branch" => parse_args(name, arguments).and_then(|args| push_branch(ctx, args)),
        "create-pr" => parse_args(name, arguments).and_then(|args| create_pr(ctx, args)),
        "update-progress" => {
            parse_args(name, arguments).and_then(|args| update_progress(ctx, args))
        }
        _ => return ToolOutput::error(format!("❌ Unknown tool: {name}")),
    };

    match result {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            ToolOutput::error(format!("❌ {e}"))
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() { Value::Object(serde_json::Map::new()) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| WorkflowError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Accept a number argument given either as a string or as a JSON number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    })
}

/// Optional variant of [`string_or_number`].
pub(crate) fn opt_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Repr>::deserialize(deserializer)?.map(|repr| match repr {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    }))
}

/// Treat blank optional text as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
