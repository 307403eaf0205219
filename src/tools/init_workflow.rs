//! `init-workflow`: set up the workflow documents in a workspace.

use serde::Deserialize;

use super::{ToolContext, ToolOutput};
use crate::core::{
    CycleConfig, CycleDuration, DetailLevel, Difficulty, DurationUnit, Result, SimpleTier,
    SizingMode, TaskDuration, WorkflowError,
};
use crate::workflow::{TemplateKind, TemplateVars, Workspace};

/// Arguments of `init-workflow`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitWorkflowArgs {
    pub workspace_root: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default, rename = "sizing_mode")]
    pub sizing_mode: Option<SizingMode>,
    #[serde(default, rename = "simple_tier")]
    pub simple_tier: Option<SimpleTier>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, rename = "task_duration")]
    pub task_duration: Option<TaskDuration>,
    #[serde(default, rename = "detail_level")]
    pub detail_level: Option<DetailLevel>,
    #[serde(default, rename = "cycle_duration_unit")]
    pub cycle_duration_unit: Option<DurationUnit>,
    #[serde(default, rename = "cycle_duration_value")]
    pub cycle_duration_value: Option<u32>,
    #[serde(default, rename = "hours_per_cycle")]
    pub hours_per_cycle: Option<f64>,
}

/// Create the config, guide, tracker and PR template.
pub fn init_workflow(ctx: &ToolContext<'_>, args: InitWorkflowArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);

    if ctx.store.exists(&workspace.config_file()) {
        return Err(WorkflowError::AlreadyInitialized);
    }

    let config = build_config(&args)?;

    workspace.ensure_docs_structure(ctx.store)?;
    config.save(ctx.store, workspace.root())?;

    ctx.store.write(&workspace.workflow_guide(), TemplateKind::Workflow.source())?;

    let vars = TemplateVars::from([
        ("CURRENT_CYCLE", "01".to_string()),
        ("TOTAL_CYCLES", "0".to_string()),
        ("DATE", crate::workflow::today()),
    ]);
    ctx.store.write(&workspace.cycles_index(), &TemplateKind::Cycles.render(&vars))?;
    ctx.store.write(&workspace.pr_template(), TemplateKind::PullRequest.source())?;

    tracing::info!(root = %workspace.root().display(), "Initialized workflow");

    let sizing = match config.sizing_mode {
        SizingMode::Simple => {
            format!("- Tier: {}", config.simple_tier.map_or("-", Difficulty::as_str))
        }
        SizingMode::Granular => format!(
            "- Difficulty: {}\n- Task Duration: {}\n- Detail Level: {}",
            config.difficulty.map_or("-", Difficulty::as_str),
            config.task_duration.map_or("-", TaskDuration::as_str),
            config.detail_level.map_or("-", DetailLevel::as_str),
        ),
    };
    let project = args
        .project_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!(" for {name}"))
        .unwrap_or_default();

    Ok(ToolOutput::success(format!(
        "✅ Workflow initialized successfully{project}!

Created:
- .cycles-config.json (configuration)
- WORKFLOW.md (workflow guide)
- docs/cycles.md (cycles tracker)
- docs/cycles/ (cycles directory)
- .github/pull_request_template.md (PR template)

Configuration:
- Sizing Mode: {}
{sizing}
- Cycle Duration: {}
- Hours Per Cycle: {}

Next steps:
1. Review WORKFLOW.md to understand the development process
2. Use create-cycle to create your first cycle
3. Use add-task to add tasks to your cycle",
        config.sizing_mode.as_str(),
        config.cycle_duration,
        config.hours_per_cycle,
    )))
}

/// Check the required parameters one at a time and assemble the config.
fn build_config(args: &InitWorkflowArgs) -> Result<CycleConfig> {
    let missing = |message: &str| WorkflowError::MissingParameter(message.to_string());

    let sizing_mode = args
        .sizing_mode
        .ok_or_else(|| missing("sizing_mode is required. Please specify 'simple' or 'granular'."))?;

    match sizing_mode {
        SizingMode::Simple if args.simple_tier.is_none() => {
            return Err(missing(
                "simple_tier is required when sizing_mode is 'simple'. Please specify 'junior', 'mid', or 'senior'.",
            ));
        }
        SizingMode::Granular => {
            if args.difficulty.is_none() {
                return Err(missing("difficulty is required when sizing_mode is 'granular'."));
            }
            if args.task_duration.is_none() {
                return Err(missing("task_duration is required when sizing_mode is 'granular'."));
            }
            if args.detail_level.is_none() {
                return Err(missing("detail_level is required when sizing_mode is 'granular'."));
            }
        }
        SizingMode::Simple => {}
    }

    let unit = args.cycle_duration_unit.ok_or_else(|| {
        missing("cycle_duration_unit is required. Please specify 'weeks', 'months', or 'quarters'.")
    })?;
    let value = args.cycle_duration_value.ok_or_else(|| {
        missing("cycle_duration_value is required. Please specify how many weeks/months/quarters per cycle.")
    })?;
    let hours_per_cycle = args.hours_per_cycle.ok_or_else(|| {
        missing("hours_per_cycle is required. Please specify how many hours are available per cycle.")
    })?;

    let config = CycleConfig {
        sizing_mode,
        simple_tier: args.simple_tier.filter(|_| sizing_mode == SizingMode::Simple),
        difficulty: args.difficulty.filter(|_| sizing_mode == SizingMode::Granular),
        task_duration: args.task_duration.filter(|_| sizing_mode == SizingMode::Granular),
        detail_level: args.detail_level.filter(|_| sizing_mode == SizingMode::Granular),
        cycle_duration: CycleDuration { unit, value },
        hours_per_cycle,
    };

    config.validate().map_err(|e| match e {
        WorkflowError::InvalidConfig(reason) => {
            WorkflowError::InvalidArguments { tool: "init-workflow".to_string(), reason }
        }
        other => other,
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{ServerConfig, SystemRunner};
    use crate::workflow::FsStore;

    fn args(value: serde_json::Value) -> InitWorkflowArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_simple_requires_tier() {
        let err = build_config(&args(json!({
            "workspaceRoot": "/tmp/x",
            "sizing_mode": "simple",
            "cycle_duration_unit": "weeks",
            "cycle_duration_value": 1,
            "hours_per_cycle": 8
        })))
        .unwrap_err();
        assert!(err.to_string().starts_with("Error: simple_tier is required"));
    }

    #[test]
    fn test_parameters_checked_in_order() {
        let err = build_config(&args(json!({
            "workspaceRoot": "/tmp/x",
            "sizing_mode": "granular",
            "difficulty": "senior"
        })))
        .unwrap_err();
        assert!(err.to_string().contains("task_duration is required"));

        let err = build_config(&args(json!({"workspaceRoot": "/tmp/x"}))).unwrap_err();
        assert!(err.to_string().contains("sizing_mode is required"));
    }

    #[test]
    fn test_out_of_range_duration() {
        let err = build_config(&args(json!({
            "workspaceRoot": "/tmp/x",
            "sizing_mode": "simple",
            "simple_tier": "junior",
            "cycle_duration_unit": "months",
            "cycle_duration_value": 3,
            "hours_per_cycle": 40
        })))
        .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidArguments { .. }));
    }

    #[test]
    fn test_init_creates_artifacts_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FsStore::new();
        let config = ServerConfig::default();
        let ctx = ToolContext { store: &store, runner: &SystemRunner::new(), config: &config };
        let init_args = args(json!({
            "workspaceRoot": temp_dir.path(),
            "projectName": "Demo",
            "sizing_mode": "simple",
            "simple_tier": "mid",
            "cycle_duration_unit": "weeks",
            "cycle_duration_value": 2,
            "hours_per_cycle": 16
        }));

        let output = init_workflow(&ctx, init_args.clone()).unwrap();
        assert!(output.text.contains("initialized successfully for Demo"));
        assert!(output.text.contains("- Cycle Duration: 2 weeks"));

        let workspace = Workspace::new(temp_dir.path().to_str().unwrap());
        assert!(workspace.missing_artifacts(&store).is_empty());
        assert!(workspace.pr_template().exists());

        let err = init_workflow(&ctx, init_args).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyInitialized));
    }
}
