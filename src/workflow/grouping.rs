//! Dependency grouping.
//!
//! Tasks are layered into tiers that can be worked on in parallel: the first
//! tier holds every task without dependencies, and each following tier holds
//! the tasks whose dependencies all sit in earlier tiers. When no further
//! task can be placed (a dependency cycle or a reference to a task that does
//! not exist), everything left over becomes one final tier flagged as
//! unresolved, so grouping always terminates and never drops a task.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use super::records::TaskRecord;

/// Shown in place of the groups when a cycle has no tasks.
pub const EMPTY_GROUPS_PLACEHOLDER: &str = "_Task dependencies will be shown here as tasks are added. Tasks will be grouped by parallel execution possibilities._";

/// Closing note rendered after the groups.
pub const PARALLELIZATION_TIP: &str = "> **Parallelization tip:** Tasks within the same group can be worked on simultaneously by different team members or agents. Tasks in different groups must be completed sequentially.";

/// One tier of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyGroup {
    /// Tasks in this tier, in input order
    pub tasks: Vec<TaskRecord>,

    /// Whether this tier holds tasks whose dependencies could not be satisfied
    pub unresolved: bool,
}

/// Position of a group, used for its display marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPosition {
    First,
    Middle,
    Last,
}

impl GroupPosition {
    /// Position of group `index` among `count` groups.
    pub fn of(index: usize, count: usize) -> Self {
        if index == 0 {
            Self::First
        } else if index + 1 == count {
            Self::Last
        } else {
            Self::Middle
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::First => "🟢",
            Self::Middle => "🟡",
            Self::Last => "🔴",
        }
    }
}

/// Ordered tiers of a cycle's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGroups {
    groups: Vec<DependencyGroup>,
}

impl DependencyGroups {
    /// Layer `records` into tiers.
    ///
    /// Input order is kept within each tier. Task numbers are assumed to be
    /// unique.
    pub fn build(records: &[TaskRecord]) -> Self {
        let mut groups = Vec::new();
        let mut placed: HashSet<&str> = HashSet::with_capacity(records.len());

        while placed.len() < records.len() {
            let frontier: Vec<&TaskRecord> = records
                .iter()
                .filter(|task| !placed.contains(task.number.as_str()))
                .filter(|task| task.dependencies.iter().all(|dep| placed.contains(dep.as_str())))
                .collect();

            if frontier.is_empty() {
                let remainder: Vec<TaskRecord> = records
                    .iter()
                    .filter(|task| !placed.contains(task.number.as_str()))
                    .cloned()
                    .collect();
                tracing::warn!(
                    tasks = ?remainder.iter().map(|t| t.number.as_str()).collect::<Vec<_>>(),
                    "Unsatisfiable dependencies, placing remaining tasks in a final group"
                );
                groups.push(DependencyGroup { tasks: remainder, unresolved: true });
                break;
            }

            for task in &frontier {
                placed.insert(task.number.as_str());
            }
            groups.push(DependencyGroup {
                tasks: frontier.into_iter().cloned().collect(),
                unresolved: false,
            });
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[DependencyGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Tier index of a task, if it is part of the grouping.
    pub fn group_of(&self, number: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.tasks.iter().any(|t| t.number == number))
    }

    /// Tasks that ended up in an unresolved tier.
    pub fn unresolved_tasks(&self) -> Vec<&TaskRecord> {
        self.groups.iter().filter(|g| g.unresolved).flat_map(|g| g.tasks.iter()).collect()
    }

    /// Label of group `index`.
    pub fn label(&self, index: usize) -> String {
        if index == 0 {
            "Start Immediately".to_string()
        } else if index + 1 == self.groups.len() && self.groups.len() > 2 {
            "Final Tasks".to_string()
        } else {
            format!("After Group {index}")
        }
    }

    /// Render the dependency block.
    ///
    /// `is_complete` reports whether a task is already checked off, so the
    /// block mirrors the task list.
    pub fn render(&self, is_complete: impl Fn(&str) -> bool) -> String {
        if self.groups.is_empty() {
            return EMPTY_GROUPS_PLACEHOLDER.to_string();
        }

        let mut out = String::new();
        for (index, group) in self.groups.iter().enumerate() {
            let marker = GroupPosition::of(index, self.groups.len()).marker();
            let _ = writeln!(out, "**{marker} Group {}** ({}):", index + 1, self.label(index));

            for task in &group.tasks {
                let check = if is_complete(&task.number) { "x" } else { " " };
                let _ = write!(
                    out,
                    "- [{check}] [{}](./{}) - {}",
                    task.number, task.file_name, task.title
                );
                if !task.dependencies.is_empty() {
                    let _ = write!(out, " - needs {}", task.dependencies.join(", "));
                }
                out.push('\n');
            }

            if group.unresolved {
                let numbers: Vec<&str> = group.tasks.iter().map(|t| t.number.as_str()).collect();
                let _ = writeln!(
                    out,
                    "\n> ⚠️ **Unresolved dependencies:** {} depend on tasks that form a cycle or do not exist in this cycle.",
                    numbers.join(", ")
                );
            }

            out.push('\n');
        }

        out.push_str(PARALLELIZATION_TIP);
        out
    }
}

/// How a task relates to the rest of the cycle, as written in its document.
pub fn parallelization_status(has_dependencies: bool, has_conflicts: bool) -> &'static str {
    match (has_dependencies, has_conflicts) {
        (false, false) => "✅ Safe to run in parallel with other tasks",
        (true, false) => {
            "⏳ Must wait for dependencies, but can run in parallel with tasks in same group"
        }
        (false, true) => "⚠️ Can start immediately but may conflict during merge",
        (true, true) => "⚠️ Must wait for dependencies and may conflict during merge",
    }
}
