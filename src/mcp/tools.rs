//! Tool definitions advertised by `tools/list`.

use std::fmt::Write as _;

use serde_json::{json, Value};

use super::protocol::MCPTool;

fn tool(name: &str, description: &str, input_schema: Value) -> MCPTool {
    MCPTool { name: name.to_string(), description: Some(description.to_string()), input_schema }
}

fn workspace_root() -> Value {
    json!({
        "type": "string",
        "description": "Absolute path to the project workspace root"
    })
}

fn number(description: &str) -> Value {
    json!({ "type": ["string", "number"], "description": description })
}

/// Every tool this server offers, in listing order.
pub fn tool_definitions() -> Vec<MCPTool> {
    vec![
        tool(
            "init-workflow",
            "Initialize the cycle-based development workflow in a project. Creates the \
             configuration, WORKFLOW.md, docs/cycles.md and a pull request template.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "projectName": { "type": "string", "description": "Name of the project" },
                    "sizing_mode": {
                        "type": "string",
                        "enum": ["simple", "granular"],
                        "description": "Pick one tier, or set difficulty, duration and detail individually"
                    },
                    "simple_tier": {
                        "type": "string",
                        "enum": ["junior", "mid", "senior"],
                        "description": "Developer tier (required when sizing_mode is 'simple')"
                    },
                    "difficulty": {
                        "type": "string",
                        "enum": ["junior", "mid", "senior"],
                        "description": "Task difficulty (required when sizing_mode is 'granular')"
                    },
                    "task_duration": {
                        "type": "string",
                        "enum": ["0.5h", "1h", "2h", "4h", "8h"],
                        "description": "Task duration (required when sizing_mode is 'granular')"
                    },
                    "detail_level": {
                        "type": "string",
                        "enum": ["high", "medium", "low"],
                        "description": "Detail level of task documents (required when sizing_mode is 'granular')"
                    },
                    "cycle_duration_unit": {
                        "type": "string",
                        "enum": ["weeks", "months", "quarters"],
                        "description": "Unit of one cycle"
                    },
                    "cycle_duration_value": {
                        "type": "number",
                        "description": "Cycle length: 1-3 weeks, 1-2 months or 1 quarter"
                    },
                    "hours_per_cycle": {
                        "type": "number",
                        "description": "Hours available for work in each cycle"
                    }
                },
                "required": [
                    "workspaceRoot",
                    "sizing_mode",
                    "cycle_duration_unit",
                    "cycle_duration_value",
                    "hours_per_cycle"
                ]
            }),
        ),
        tool(
            "create-cycle",
            "Create a new numbered development cycle with its README.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "cycleName": { "type": "string", "description": "Name of the cycle (e.g. 'Setup Authentication')" },
                    "cycleDescription": { "type": "string", "description": "What this cycle covers" },
                    "cycleGoal": { "type": "string", "description": "Goal of the cycle" },
                    "successCriteria": { "type": "string", "description": "Markdown list of success criteria" },
                    "deliverables": { "type": "string", "description": "Markdown list of deliverables" }
                },
                "required": ["workspaceRoot", "cycleName"]
            }),
        ),
        tool(
            "add-task",
            "Add a task document to a cycle and refresh the cycle README, including the \
             dependency groups and progress.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "cycleNumber": number("Cycle number (e.g. '01')"),
                    "taskTitle": { "type": "string", "description": "Title of the task" },
                    "taskOverview": { "type": "string", "description": "What the task is about" },
                    "taskSteps": { "type": "string", "description": "Markdown steps to complete the task" },
                    "acceptanceCriteria": { "type": "string", "description": "Markdown checklist of acceptance criteria" },
                    "testingInstructions": { "type": "string", "description": "How to test the work" },
                    "tips": { "type": "string", "description": "Hints for the developer" },
                    "troubleshooting": { "type": "string", "description": "Known issues and fixes" },
                    "nextSteps": { "type": "string", "description": "What comes after this task" },
                    "prerequisites": { "type": "string", "description": "Knowledge or setup needed first" },
                    "dependencies": { "type": "string", "description": "Tasks that must complete first (e.g. 'Task 001, Task 002')" },
                    "conflicts": { "type": "string", "description": "Tasks touching the same areas (e.g. 'Task 003 (both modify auth)')" },
                    "modifiedAreas": { "type": "string", "description": "Files or modules this task changes" },
                    "difficulty": { "type": "string", "enum": ["junior", "mid", "senior"], "description": "Override the configured difficulty" },
                    "duration": { "type": "string", "enum": ["0.5h", "1h", "2h", "4h", "8h"], "description": "Override the configured duration" },
                    "detailLevel": { "type": "string", "enum": ["high", "medium", "low"], "description": "Override the configured detail level" }
                },
                "required": ["workspaceRoot", "cycleNumber", "taskTitle"]
            }),
        ),
        tool(
            "commit-task",
            "Stage all changes and commit them with a conventional message scoped to the cycle.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "cycleNumber": number("Cycle number (e.g. '01')"),
                    "message": { "type": "string", "description": "Commit subject" },
                    "body": { "type": "string", "description": "Optional commit body" }
                },
                "required": ["workspaceRoot", "cycleNumber", "message"]
            }),
        ),
        tool(
            "push-branch",
            "Push the current branch to the remote. Protected branches are refused.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root()
                },
                "required": ["workspaceRoot"]
            }),
        ),
        tool(
            "create-pr",
            "Open a pull request for a task and mark the task complete in the cycle README.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "cycleNumber": number("Cycle number (e.g. '01')"),
                    "taskNumber": number("Task number (e.g. '001')"),
                    "taskTitle": { "type": "string", "description": "Title of the task" },
                    "changes": { "type": "array", "items": { "type": "string" }, "description": "Summary of the changes" },
                    "acceptanceCriteria": { "type": "array", "items": { "type": "string" }, "description": "Acceptance criteria to check" },
                    "notes": { "type": "string", "description": "Additional notes for reviewers" }
                },
                "required": ["workspaceRoot", "cycleNumber", "taskNumber", "taskTitle"]
            }),
        ),
        tool(
            "update-progress",
            "Mark a task complete, recalculate cycle progress and optionally log a work session.",
            json!({
                "type": "object",
                "properties": {
                    "workspaceRoot": workspace_root(),
                    "cycleNumber": number("Cycle number (e.g. '01')"),
                    "taskNumber": number("Task to mark complete (e.g. '001')"),
                    "sessionDate": { "type": "string", "description": "Session date (YYYY-MM-DD, defaults to today)" },
                    "sessionDuration": { "type": "string", "description": "Session duration (e.g. '2h')" },
                    "sessionNotes": { "type": "string", "description": "Notes about the session" }
                },
                "required": ["workspaceRoot", "cycleNumber"]
            }),
        ),
    ]
}

/// Format a tool for display.
pub fn format_tool(tool: &MCPTool) -> String {
    let mut output = tool.name.clone();

    if let Some(ref desc) = tool.description {
        let _ = write!(output, "\n  {desc}");
    }

    let required: Vec<&str> = tool.input_schema["required"]
        .as_array()
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if let Some(props) = tool.input_schema["properties"].as_object() {
        if !props.is_empty() {
            output.push_str("\n  Parameters:");
            for (name, schema) in props {
                let type_str = match &schema["type"] {
                    Value::String(t) => t.clone(),
                    Value::Array(types) => {
                        types.iter().filter_map(Value::as_str).collect::<Vec<_>>().join("|")
                    }
                    _ => "any".to_string(),
                };
                let desc = schema["description"].as_str().unwrap_or("");
                let marker = if required.contains(&name.as_str()) { "*" } else { "" };
                let _ = write!(output, "\n    - {name}{marker} ({type_str}): {desc}");
            }
        }
    }

    output
}
