//! `add-task`: write a task document and refresh the cycle README.

use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{non_empty, string_or_number, ToolContext, ToolOutput};
use crate::core::{
    CycleConfig, DetailLevel, Difficulty, Result, SizingOverrides, TaskDuration, WorkflowError,
};
use crate::workflow::{
    next_task_number, pad_number, parallelization_status, parse_dependencies, slugify,
    CycleReadme, CycleRecords, DependencyGroups, TaskRecord, TemplateKind, TemplateVars, Workspace,
    CYCLE_WIDTH, NO_DEPENDENCIES,
};

static BARE_TASK_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{3})\b").expect("valid task number pattern"));

/// Arguments of `add-task`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskArgs {
    pub workspace_root: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cycle_number: String,
    pub task_title: String,
    #[serde(default)]
    pub task_overview: Option<String>,
    #[serde(default)]
    pub task_steps: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
    #[serde(default)]
    pub testing_instructions: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
    #[serde(default)]
    pub troubleshooting: Option<String>,
    #[serde(default)]
    pub next_steps: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    /// e.g. "Task 001, Task 002"
    #[serde(default)]
    pub dependencies: Option<String>,
    /// e.g. "Task 003 (both modify auth)"
    #[serde(default)]
    pub conflicts: Option<String>,
    #[serde(default)]
    pub modified_areas: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
    #[serde(default)]
    pub detail_level: Option<DetailLevel>,
}

pub fn add_task(ctx: &ToolContext<'_>, args: AddTaskArgs) -> Result<ToolOutput> {
    let workspace = Workspace::new(&args.workspace_root);
    workspace.require_initialized(ctx.store)?;
    let config = CycleConfig::require(ctx.store, workspace.root())?;

    let title = args.task_title.trim();
    if title.is_empty() {
        return Err(WorkflowError::MissingParameter("taskTitle must not be empty.".to_string()));
    }

    let cycle_number = pad_number(&args.cycle_number, CYCLE_WIDTH);
    let cycle = workspace.find_cycle(ctx.store, &cycle_number)?;
    let readme_path = cycle.readme();
    let readme_content =
        ctx.store.read(&readme_path)?.ok_or_else(|| WorkflowError::DocumentNotFound(readme_path.clone()))?;

    let sizing = config.task_sizing(SizingOverrides {
        difficulty: args.difficulty,
        duration: args.duration,
        detail_level: args.detail_level,
    })?;

    let number = next_task_number(&ctx.store.list(&cycle.path)?);
    let slug = slugify(title);
    let file_name = if slug.is_empty() { format!("{number}-task.md") } else { format!("{number}-{slug}.md") };

    let dependencies = normalize_dependencies(args.dependencies.as_deref());
    let conflicts = non_empty(args.conflicts.as_deref())
        .filter(|c| !c.eq_ignore_ascii_case("none"))
        .unwrap_or("None")
        .to_string();
    let has_dependencies = !parse_dependencies(&dependencies).is_empty();
    let has_conflicts = conflicts != "None";

    let vars = TemplateVars::from([
        ("TASK_NUMBER", number.clone()),
        ("TASK_TITLE", title.to_string()),
        ("TASK_DURATION", sizing.duration.as_str().to_string()),
        ("DIFFICULTY", sizing.difficulty.display_name().to_string()),
        ("PREREQUISITES", text_or(args.prerequisites.as_deref(), "None")),
        ("DEPENDENCIES", dependencies),
        ("CONFLICTS", conflicts),
        (
            "PARALLELIZATION_STATUS",
            parallelization_status(has_dependencies, has_conflicts).to_string(),
        ),
        (
            "MODIFIED_AREAS",
            text_or(
                args.modified_areas.as_deref(),
                "_To be determined during implementation. Update this section as you work._",
            ),
        ),
        (
            "TASK_OVERVIEW",
            non_empty(args.task_overview.as_deref()).map_or_else(
                || format!("This task focuses on {}.", title.to_lowercase()),
                str::to_string,
            ),
        ),
        ("TASK_STEPS", task_steps(args.task_steps.as_deref(), sizing.detail_level)),
        (
            "ACCEPTANCE_CRITERIA",
            non_empty(args.acceptance_criteria.as_deref()).map_or_else(
                || format!("- [ ] {title} is implemented\n- [ ] Tests pass\n- [ ] Code is documented"),
                str::to_string,
            ),
        ),
        (
            "TESTING_INSTRUCTIONS",
            text_or(
                args.testing_instructions.as_deref(),
                "1. Run the application\n2. Verify functionality\n3. Check for errors",
            ),
        ),
        (
            "TIPS",
            text_or(
                args.tips.as_deref(),
                "- Break down complex problems into smaller steps\n- Test incrementally\n- Commit your work frequently",
            ),
        ),
        (
            "TROUBLESHOOTING",
            text_or(
                args.troubleshooting.as_deref(),
                "_Common issues and solutions will be documented here as they arise._",
            ),
        ),
        (
            "NEXT_STEPS",
            text_or(args.next_steps.as_deref(), "continue building on this foundation"),
        ),
    ]);
    let task_text = TemplateKind::Task.render(&vars);

    // All reads precede the first write; a failed read leaves the cycle untouched.
    let mut cycle_records = CycleRecords::load(ctx.store, &cycle.path)?;
    match TaskRecord::parse(&task_text, &file_name) {
        Some(record) => cycle_records.records.push(record),
        None => cycle_records.skipped.push(file_name.clone()),
    }

    let hours = sizing.duration.hours();
    let mut readme = CycleReadme::parse(&readme_content);
    if !readme.add_task_entry(&number, &file_name, title, hours) {
        tracing::warn!(path = %readme_path.display(), "Cycle README has no task list");
    }
    readme.set_task_count(readme.task_count().unwrap_or(0) + 1);
    let estimated = readme.add_estimated_hours(hours);

    let groups = DependencyGroups::build(&cycle_records.records);
    readme.set_dependency_groups(&groups);
    let progress = readme.recalculate_progress();

    ctx.store.write(&cycle.path.join(&file_name), &task_text)?;
    ctx.store.write(&readme_path, &readme.render())?;

    tracing::info!(cycle = %cycle.name, task = %number, "Added task");

    let mut text = format!(
        "✅ Task {number} created successfully!

Created:
- {cycle_dir}/{file_name}

Configuration:
- Difficulty: {difficulty}
- Duration: {duration}
- Detail Level: {detail}

Updated cycle README with task entry ({progress} complete).
",
        cycle_dir = cycle.name,
        difficulty = sizing.difficulty.as_str(),
        duration = sizing.duration.as_str(),
        detail = sizing.detail_level.as_str(),
    );

    text.push_str("\nDependency groups:\n");
    for (index, group) in groups.groups().iter().enumerate() {
        let numbers: Vec<&str> = group.tasks.iter().map(|t| t.number.as_str()).collect();
        let _ = writeln!(text, "- Group {} ({}): {}", index + 1, groups.label(index), numbers.join(", "));
    }

    let warnings = collect_warnings(&cycle_records, &groups, estimated, readme.hours_available());
    if !warnings.is_empty() {
        text.push_str("\nWarnings:\n");
        for warning in &warnings {
            let _ = writeln!(text, "- ⚠️ {warning}");
        }
    }

    let _ = write!(
        text,
        "
Next steps:
1. Review the task file: docs/cycles/{cycle_dir}/{file_name}
2. Create a feature branch: feat/cycle-{cycle_number}-task-{number}-{slug}
3. Follow the workflow in WORKFLOW.md",
        cycle_dir = cycle.name,
    );

    Ok(ToolOutput::success(text))
}

/// Canonical dependency text for a task document.
///
/// Blank or "None" becomes the sentinel. Bare three-digit numbers
/// ("001, 002") are rewritten as task references so the grouper sees them.
fn normalize_dependencies(raw: Option<&str>) -> String {
    let Some(text) = non_empty(raw) else {
        return NO_DEPENDENCIES.to_string();
    };
    if text.eq_ignore_ascii_case("none") || text == NO_DEPENDENCIES {
        return NO_DEPENDENCIES.to_string();
    }
    if parse_dependencies(text).is_empty() && BARE_TASK_NUMBER.is_match(text) {
        return BARE_TASK_NUMBER.replace_all(text, "Task $1").into_owned();
    }
    text.to_string()
}

/// Task steps, shaped by the detail level when none are given.
fn task_steps(provided: Option<&str>, detail_level: DetailLevel) -> String {
    if let Some(steps) = non_empty(provided) {
        return steps.to_string();
    }

    let default = "1. Review the requirements\n2. Implement the solution\n3. Test your implementation";
    match detail_level {
        DetailLevel::High => format!(
            "{default}\n\n_Detailed step-by-step instructions will guide you through this task._"
        ),
        DetailLevel::Medium => default.to_string(),
        DetailLevel::Low => {
            "_High-level objective defined. Implementation details left to your expertise._"
                .to_string()
        }
    }
}

fn text_or(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

fn collect_warnings(
    cycle: &CycleRecords,
    groups: &DependencyGroups,
    estimated: Option<f64>,
    available: Option<f64>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if !cycle.skipped.is_empty() {
        warnings.push(format!(
            "Skipped {} document(s) without a task heading: {}",
            cycle.skipped.len(),
            cycle.skipped.join(", ")
        ));
    }

    for (task, missing) in cycle.dangling_references() {
        warnings.push(format!("Task {task} depends on Task {missing}, which does not exist in this cycle"));
    }

    let unresolved: Vec<&str> = groups.unresolved_tasks().iter().map(|t| t.number.as_str()).collect();
    if !unresolved.is_empty() {
        warnings.push(format!(
            "Unresolved dependencies (cycle or missing task) for: {}",
            unresolved.join(", ")
        ));
    }

    if let (Some(estimated), Some(available)) = (estimated, available) {
        if estimated > available {
            warnings.push(format!(
                "Estimated hours ({estimated}) exceed the hours available in this cycle ({available})"
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dependencies() {
        assert_eq!(normalize_dependencies(None), NO_DEPENDENCIES);
        assert_eq!(normalize_dependencies(Some("  ")), NO_DEPENDENCIES);
        assert_eq!(normalize_dependencies(Some("None")), NO_DEPENDENCIES);
        assert_eq!(normalize_dependencies(Some("Task 001, Task 002")), "Task 001, Task 002");
        assert_eq!(normalize_dependencies(Some("001, 002")), "Task 001, Task 002");
        assert_eq!(normalize_dependencies(Some("design sign-off")), "design sign-off");
    }

    #[test]
    fn test_task_steps_by_detail_level() {
        assert!(task_steps(None, DetailLevel::High).ends_with("guide you through this task._"));
        assert!(task_steps(None, DetailLevel::Medium).starts_with("1. Review the requirements"));
        assert!(task_steps(None, DetailLevel::Low).starts_with("_High-level objective"));
        assert_eq!(task_steps(Some("1. Do it"), DetailLevel::Low), "1. Do it");
    }

    #[test]
    fn test_hours_warning() {
        let warnings = collect_warnings(
            &CycleRecords::default(),
            &DependencyGroups::default(),
            Some(10.0),
            Some(8.0),
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceed"));

        let none = collect_warnings(&CycleRecords::default(), &DependencyGroups::default(), Some(8.0), Some(8.0));
        assert!(none.is_empty());
    }
}
