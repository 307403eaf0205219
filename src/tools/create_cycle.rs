//! `create-cycle`: add a numbered cycle directory with its README.

use serde::Deserialize;

use super::{non_empty, ToolContext, ToolOutput};
use crate::core::{CycleConfig, Result};
use crate::workflow::{
    next_cycle_number, slugify, CyclesIndex, TemplateKind, TemplateVars, Workspace, CYCLE_WIDTH,
    EMPTY_GROUPS_PLACEHOLDER, NO_TASKS_PLACEHOLDER,
};

/// Arguments of `create-cycle`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCycleArgs {
    pub workspace_root: String,
    pub cycle_name: String,
    #[serde(default)]
    pub cycle_description: Option<String>,
    #[serde(default)]
    pub cycle_goal: Option<String>,
    #[serde(default)]
    pub success_criteria: Option<String>,
    #[serde(default)]
    pub deliverables: Option<String>,
}

pub fn create_cycle(ctx: &ToolContext<'_>, args: CreateCycleArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    workspace.require_initialized(ctx.store)?;
    let config = CycleConfig::require(ctx.store, workspace.root())?;

    let existing = workspace.cycle_names(ctx.store)?;
    let number = next_cycle_number(&existing);
    let next_number =
        format!("{:0width$}", number.parse::<u32>().unwrap_or(0) + 1, width = CYCLE_WIDTH);

    let cycle_name = args.cycle_name.trim();
    let slug = slugify(cycle_name);
    let dir_name = if slug.is_empty() { format!("{number}-cycle") } else { format!("{number}-{slug}") };
    let cycle_dir = workspace.cycles_dir().join(&dir_name);
    ctx.store.create_dir_all(&cycle_dir)?;

    let duration = config.cycle_duration.to_string();
    let vars = TemplateVars::from([
        ("CYCLE_NUMBER", number.clone()),
        ("CYCLE_NAME", cycle_name.to_string()),
        ("CYCLE_DURATION", duration.clone()),
        ("ESTIMATED_HOURS", "0".to_string()),
        ("HOURS_AVAILABLE", config.hours_per_cycle.to_string()),
        (
            "CYCLE_DESCRIPTION",
            non_empty(args.cycle_description.as_deref()).map_or_else(
                || format!("This cycle focuses on {}.", cycle_name.to_lowercase()),
                str::to_string,
            ),
        ),
        (
            "CYCLE_GOAL",
            non_empty(args.cycle_goal.as_deref())
                .unwrap_or("Complete all tasks in this cycle successfully.")
                .to_string(),
        ),
        ("TASK_COUNT", "0".to_string()),
        ("TASK_LIST", NO_TASKS_PLACEHOLDER.to_string()),
        ("TASK_DEPENDENCIES", EMPTY_GROUPS_PLACEHOLDER.to_string()),
        (
            "SUCCESS_CRITERIA",
            non_empty(args.success_criteria.as_deref())
                .unwrap_or(
                    "- ✅ All tasks completed\n- ✅ All acceptance criteria met\n- ✅ Code is tested and working",
                )
                .to_string(),
        ),
        (
            "DELIVERABLES",
            non_empty(args.deliverables.as_deref())
                .unwrap_or("- ✅ Working implementation\n- ✅ Tests passing\n- ✅ Documentation updated")
                .to_string(),
        ),
        ("NEXT_CYCLE", next_number),
    ]);
    ctx.store.write(&cycle_dir.join("README.md"), &TemplateKind::CycleReadme.render(&vars))?;

    let index_path = workspace.cycles_index();
    let mut tracker_updated = false;
    if let Some(content) = ctx.store.read(&index_path)? {
        let mut index = CyclesIndex::parse(&content);
        if index.add_cycle(&number, cycle_name, &dir_name, &duration) {
            index.set_total_cycles(existing.len() + 1);
            ctx.store.write(&index_path, &index.render())?;
            tracker_updated = true;
        } else {
            tracing::warn!(path = %index_path.display(), "Cycles tracker has no cycle list");
        }
    }

    tracing::info!(cycle = %number, dir = %dir_name, "Created cycle");

    let tracker_line = if tracker_updated { "\n- docs/cycles.md (cycle added)" } else { "" };
    Ok(ToolOutput::success(format!(
        "✅ Cycle {number} created successfully!

Created:
- {dir_name}/
- {dir_name}/README.md{tracker_line}

Configuration:
- Duration: {duration}
- Hours Available: {hours}

Next steps:
1. Review the cycle README: docs/cycles/{dir_name}/README.md
2. Use add-task to create tasks for this cycle
3. Ensure total task hours ≤ {hours} hours",
        hours = config.hours_per_cycle,
    )))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{ServerConfig, SystemRunner};
    use crate::tools::{init_workflow, InitWorkflowArgs};
    use crate::workflow::{DocumentStore, FsStore};

    fn init(ctx: &ToolContext<'_>, root: &std::path::Path) {
        let args: InitWorkflowArgs = serde_json::from_value(json!({
            "workspaceRoot": root,
            "sizing_mode": "simple",
            "simple_tier": "mid",
            "cycle_duration_unit": "weeks",
            "cycle_duration_value": 1,
            "hours_per_cycle": 8
        }))
        .unwrap();
        init_workflow(ctx, args).unwrap();
    }

    fn cycle_args(root: &std::path::Path, name: &str) -> CreateCycleArgs {
        serde_json::from_value(json!({"workspaceRoot": root, "cycleName": name})).unwrap()
    }

    #[test]
    fn test_create_cycles_in_sequence() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FsStore::new();
        let config = ServerConfig::default();
        let ctx = ToolContext { store: &store, runner: &SystemRunner::new(), config: &config };
        init(&ctx, temp_dir.path());

        let first = create_cycle(&ctx, cycle_args(temp_dir.path(), "Setup Auth")).unwrap();
        assert!(first.text.starts_with("✅ Cycle 01 created successfully!"));
        let second = create_cycle(&ctx, cycle_args(temp_dir.path(), "API")).unwrap();
        assert!(second.text.contains("02-api/README.md"));

        let readme = store
            .read(&temp_dir.path().join("docs/cycles/01-setup-auth/README.md"))
            .unwrap()
            .unwrap();
        assert!(readme.starts_with("# Cycle 01: Setup Auth\n"));
        assert!(readme.contains("**Hours Available**: 8 hours"));
        assert!(readme.contains("This cycle focuses on setup auth."));
        assert!(readme.contains("**Cycle 02** will build on this foundation"));
        assert!(readme.contains("[░░░░░░░░░░░░░░░░░░░░] 0%"));

        let tracker = store.read(&temp_dir.path().join("docs/cycles.md")).unwrap().unwrap();
        assert!(tracker.contains("**Total Cycles Planned**: 2"));
        assert!(tracker.contains("[Cycle 01: Setup Auth](./cycles/01-setup-auth/README.md)"));
        assert!(tracker.contains("[Cycle 02: API](./cycles/02-api/README.md)"));
    }

    #[test]
    fn test_requires_initialized_workspace() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = ServerConfig::default();
        let ctx = ToolContext { store: &FsStore::new(), runner: &SystemRunner::new(), config: &config };

        let err = create_cycle(&ctx, cycle_args(temp_dir.path(), "Setup")).unwrap_err();
        assert!(err.to_string().contains("  - WORKFLOW.md"));
        assert!(!temp_dir.path().join("docs").exists());
    }
}
