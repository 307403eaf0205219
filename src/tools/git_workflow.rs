//! `commit-task`, `push-branch` and `create-pr`.

use serde::Deserialize;

use super::{non_empty, string_or_number, ToolContext, ToolOutput};
use crate::core::{Result, WorkflowError};
use crate::git::{self, GitCli, PullRequestCli};
use crate::workflow::{
    pad_number, CycleReadme, MarkdownDocument, TemplateKind, TemplateVars, Workspace, CYCLE_WIDTH,
    TASK_WIDTH,
};

/// Arguments of `commit-task`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTaskArgs {
    pub workspace_root: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cycle_number: String,
    pub message: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Arguments of `push-branch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushBranchArgs {
    pub workspace_root: String,
}

/// Arguments of `create-pr`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrArgs {
    pub workspace_root: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cycle_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub task_number: String,
    pub task_title: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Stage everything and commit with a cycle-scoped conventional message.
pub fn commit_task(ctx: &ToolContext<'_>, args: CommitTaskArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    workspace.require_initialized(ctx.store)?;

    let message = non_empty(Some(args.message.as_str()))
        .ok_or_else(|| WorkflowError::MissingParameter("message must not be empty.".to_string()))?;
    let cycle_number = pad_number(&args.cycle_number, CYCLE_WIDTH);

    let git = GitCli::new(ctx.runner, &ctx.config.git, workspace.root());
    git.stage_all()?;
    git.commit(&git::commit_message(&cycle_number, message, args.body.as_deref()))?;

    Ok(ToolOutput::success(format!(
        "✅ Changes committed successfully!

Commit: {}

Next steps:
- Continue working and commit incrementally, or
- Use push-branch to push your changes",
        git::commit_subject(&cycle_number, message)
    )))
}

/// Push the current branch, refusing protected branches.
pub fn push_branch(ctx: &ToolContext<'_>, args: PushBranchArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    let branch = git::current_branch(ctx.runner, &ctx.config.git, workspace.root())?;

    GitCli::new(ctx.runner, &ctx.config.git, workspace.root()).push(&branch)?;

    Ok(ToolOutput::success(format!(
        "✅ Branch pushed successfully!

Branch: {branch}
Remote: {}

Next steps:
- Use create-pr to create a pull request",
        ctx.config.git.remote
    )))
}

/// Open a pull request for a task and check the task off.
///
/// When the PR-hosting CLI fails, the caller gets everything needed to open
/// the PR by hand instead of an error.
pub fn create_pr(ctx: &ToolContext<'_>, args: CreatePrArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    workspace.require_initialized(ctx.store)?;

    let cycle_number = pad_number(&args.cycle_number, CYCLE_WIDTH);
    let task_number = pad_number(&args.task_number, TASK_WIDTH);
    let task_title = args.task_title.trim();

    let branch = git::current_branch(ctx.runner, &ctx.config.git, workspace.root())?;
    let base = &ctx.config.git.base_branch;
    let title = git::commit_subject(&cycle_number, task_title);
    let body = pr_body(&cycle_number, &task_number, task_title, &args);

    let pr = PullRequestCli::new(ctx.runner, &ctx.config.pr, workspace.root());
    let url = match pr.create(&title, &body, base) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to manual pull request instructions");
            return Ok(ToolOutput::success(format!(
                "⚠️ Could not create the pull request automatically ({e}). Please create the PR manually:

Title: {title}
Branch: {branch}
Base: {base}

PR Body:
{body}

After creating the PR, run update-progress with taskNumber {task_number} to mark the task complete."
            )));
        }
    };

    let completion = match mark_task_complete(ctx, &workspace, &cycle_number, &task_number) {
        Ok(()) => format!("Task {task_number} has been marked as complete in the cycle README."),
        Err(e) => {
            tracing::warn!(error = %e, task = %task_number, "Could not mark task complete");
            format!("⚠️ Task {task_number} was not marked complete: {e}")
        }
    };

    let url_line = if url.is_empty() { String::new() } else { format!("\nURL: {url}") };
    Ok(ToolOutput::success(format!(
        "✅ Pull Request created successfully!

Title: {title}
Branch: {branch}{url_line}

{completion}

Next steps:
1. Review the PR
2. Wait for CI/CD checks to pass
3. Merge the PR when ready
4. Start the next task"
    )))
}

/// Render the PR template for a task.
fn pr_body(cycle_number: &str, task_number: &str, task_title: &str, args: &CreatePrArgs) -> String {
    let checklist =
        args.acceptance_criteria.iter().map(|c| format!("- [ ] {c}")).collect::<Vec<_>>().join("\n");
    let vars = TemplateVars::from([
        ("TASK_NUMBER", task_number.to_string()),
        ("CYCLE_NUMBER", cycle_number.to_string()),
        ("TASK_TITLE", task_title.to_string()),
        ("ACCEPTANCE_CRITERIA_CHECKLIST", checklist),
    ]);
    let mut doc = MarkdownDocument::parse(&TemplateKind::PullRequest.render(&vars));

    if !args.changes.is_empty() {
        if let Some(section) = doc.section_mut("## Changes") {
            let changes = args.changes.iter().map(|c| format!("- {c}")).collect::<Vec<_>>().join("\n");
            section.body = format!("\n{changes}\n\n");
        }
    }

    if let Some(notes) = non_empty(args.notes.as_deref()) {
        if let Some(section) = doc.section_mut("## Notes") {
            section.body = format!("\n{notes}\n");
        }
    }

    doc.render()
}

fn mark_task_complete(
    ctx: &ToolContext<'_>,
    workspace: &Workspace,
    cycle_number: &str,
    task_number: &str,
) -> Result<()> {
    let cycle = workspace.find_cycle(ctx.store, cycle_number)?;
    let path = cycle.readme();
    let content = ctx.store.read(&path)?.ok_or_else(|| WorkflowError::DocumentNotFound(path.clone()))?;

    let mut readme = CycleReadme::parse(&content);
    readme.mark_complete(task_number)?;
    readme.recalculate_progress();
    ctx.store.write(&path, &readme.render())?;
    Ok(())
}
