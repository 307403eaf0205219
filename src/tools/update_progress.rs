//! `update-progress`: check off a task, recompute progress, log a session.

use serde::Deserialize;

use super::{non_empty, opt_string_or_number, string_or_number, ToolContext, ToolOutput};
use crate::core::{Result, WorkflowError};
use crate::workflow::{pad_number, today, CycleReadme, SessionEntry, Workspace, CYCLE_WIDTH, TASK_WIDTH};

/// Arguments of `update-progress`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressArgs {
    pub workspace_root: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cycle_number: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub task_number: Option<String>,
    #[serde(default)]
    pub session_date: Option<String>,
    #[serde(default)]
    pub session_duration: Option<String>,
    #[serde(default)]
    pub session_notes: Option<String>,
}

pub fn update_progress(ctx: &ToolContext<'_>, args: UpdateProgressArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    workspace.require_initialized(ctx.store)?;

    let session_date = non_empty(args.session_date.as_deref());
    let session_duration = non_empty(args.session_duration.as_deref());
    if session_date.is_some() && session_duration.is_none() {
        return Err(WorkflowError::MissingParameter(
            "sessionDuration is required to log a session.".to_string(),
        ));
    }

    let cycle_number = pad_number(&args.cycle_number, CYCLE_WIDTH);
    let cycle = workspace.find_cycle(ctx.store, &cycle_number)?;
    let readme_path = cycle.readme();
    let content =
        ctx.store.read(&readme_path)?.ok_or_else(|| WorkflowError::DocumentNotFound(readme_path.clone()))?;
    let mut readme = CycleReadme::parse(&content);

    let task_number = non_empty(args.task_number.as_deref()).map(|n| pad_number(n, TASK_WIDTH));
    if let Some(number) = &task_number {
        readme.mark_complete(number)?;
    }

    let progress = readme.recalculate_progress();

    let mut session_line = None;
    if let Some(duration) = session_duration {
        let entry = SessionEntry {
            date: session_date.map_or_else(today, str::to_string),
            duration: duration.to_string(),
            tasks: task_number.clone(),
            notes: non_empty(args.session_notes.as_deref()).map(str::to_string),
        };
        if readme.log_session(&entry) {
            session_line = Some(format!("Session logged: {} ({})", entry.date, entry.duration));
        } else {
            tracing::warn!(path = %readme_path.display(), "Cycle README has no session log table");
            session_line = Some("⚠️ Session not logged: the cycle README has no session log table.".to_string());
        }
    }

    ctx.store.write(&readme_path, &readme.render())?;
    tracing::info!(cycle = %cycle.name, %progress, "Updated progress");

    let mut lines = vec!["✅ Progress updated successfully!".to_string(), String::new()];
    if let Some(number) = &task_number {
        lines.push(format!("Task {number} marked as complete."));
    }
    lines.push(format!("Progress: {}", progress.bar_line()));
    lines.extend(session_line);
    lines.push(String::new());
    lines.push(format!("Updated cycle README: docs/cycles/{}/README.md", cycle.name));

    Ok(ToolOutput::success(lines.join("\n")))
}
