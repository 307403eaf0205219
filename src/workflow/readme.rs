//! Cycle README and cycles tracker documents.
//!
//! Both documents are generated from templates and then maintained by the
//! tools. Every anchor the tools rely on is a constant here.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::document::MarkdownDocument;
use super::grouping::DependencyGroups;
use super::progress::{self, ProgressState};
use crate::core::{Result, WorkflowError};

/// Heading prefix of the task list, `## Tasks (N total)`.
pub const TASKS_HEADING: &str = "## Tasks (";

/// Heading of the dependency block.
pub const DEPENDENCIES_HEADING: &str = "## Task Dependencies";

/// Heading of the progress block.
pub const PROGRESS_HEADING: &str = "## Progress Tracker";

/// Sub-heading of the session log table.
pub const SESSION_LOG_HEADING: &str = "### Session Log";

/// Task list placeholder of a cycle without tasks.
pub const NO_TASKS_PLACEHOLDER: &str = "_No tasks yet. Use add-task to create tasks._";

/// Session log row of a cycle nobody has worked on yet.
pub const NOT_STARTED_ROW: &str = "| -    | -        | -               | Not started |";

/// Heading of the cycle list in `docs/cycles.md`.
pub const CYCLES_HEADING: &str = "## Cycles";

/// Cycle list placeholder in `docs/cycles.md`.
pub const NO_CYCLES_PLACEHOLDER: &str = "_Cycles will be listed here as they are created_";

static TASK_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^## Tasks \((\d+) total\)").expect("valid task count pattern"));
static ESTIMATED_HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Estimated Hours\*\*: (\d+(?:\.\d+)?) hours").expect("valid hours pattern")
});
static HOURS_AVAILABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Hours Available\*\*: (\d+(?:\.\d+)?) hours").expect("valid hours pattern")
});
static TOTAL_CYCLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Total Cycles Planned\*\*: \d+").expect("valid total cycles pattern")
});

/// One row of a cycle's session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub date: String,
    pub duration: String,
    pub tasks: Option<String>,
    pub notes: Option<String>,
}

impl fmt::Display for SessionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} |",
            self.date,
            self.duration,
            self.tasks.as_deref().unwrap_or("-"),
            self.notes.as_deref().unwrap_or("-")
        )
    }
}

/// A cycle's `README.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReadme {
    doc: MarkdownDocument,
}

impl CycleReadme {
    pub fn parse(content: &str) -> Self {
        Self { doc: MarkdownDocument::parse(content) }
    }

    pub fn render(&self) -> String {
        self.doc.render()
    }

    /// Number in the `## Tasks (N total)` heading.
    pub fn task_count(&self) -> Option<usize> {
        let section = self.doc.section(TASKS_HEADING)?;
        TASK_COUNT.captures(section.heading()).and_then(|caps| caps[1].parse().ok())
    }

    pub fn set_task_count(&mut self, count: usize) {
        if let Some(section) = self.doc.section_mut(TASKS_HEADING) {
            section.set_title(&format!("Tasks ({count} total)"));
        }
    }

    /// Append a task-list entry, replacing the empty-list placeholder.
    ///
    /// Returns `false` when the document has no task list.
    pub fn add_task_entry(&mut self, number: &str, file_name: &str, title: &str, hours: f64) -> bool {
        let Some(section) = self.doc.section_mut(TASKS_HEADING) else {
            return false;
        };

        let entry = format!("- [ ] **[{number}](./{file_name})** - {title} ({hours}h)");
        if section.body.contains(NO_TASKS_PLACEHOLDER) {
            section.body = section.body.replacen(NO_TASKS_PLACEHOLDER, &entry, 1);
        } else {
            let kept = section.body.trim_end().len();
            section.body.truncate(kept);
            section.body.push('\n');
            section.body.push_str(&entry);
            section.body.push_str("\n\n");
        }
        true
    }

    /// Value of `**Estimated Hours**`.
    pub fn estimated_hours(&self) -> Option<f64> {
        capture_hours(&ESTIMATED_HOURS, &self.doc.preamble)
    }

    /// Value of `**Hours Available**`.
    pub fn hours_available(&self) -> Option<f64> {
        capture_hours(&HOURS_AVAILABLE, &self.doc.preamble)
    }

    /// Add `hours` to `**Estimated Hours**`, returning the new total.
    pub fn add_estimated_hours(&mut self, hours: f64) -> Option<f64> {
        let total = self.estimated_hours()? + hours;
        let line = format!("**Estimated Hours**: {total} hours");
        self.doc.preamble =
            ESTIMATED_HOURS.replace(&self.doc.preamble, regex::NoExpand(&line)).into_owned();
        Some(total)
    }

    /// Whether the task list has a checked entry for `number`.
    pub fn is_task_complete(&self, number: &str) -> bool {
        self.doc
            .section(TASKS_HEADING)
            .is_some_and(|s| s.body.contains(&format!("- [x] **[{number}]")))
    }

    /// Replace the dependency block with freshly rendered groups.
    pub fn set_dependency_groups(&mut self, groups: &DependencyGroups) -> bool {
        let block = groups.render(|number| self.is_task_complete(number));
        let Some(section) = self.doc.section_mut(DEPENDENCIES_HEADING) else {
            return false;
        };
        section.body = format!("\n{block}\n\n");
        true
    }

    /// Check off task `number` in the task list and the dependency block.
    pub fn mark_complete(&mut self, number: &str) -> Result<()> {
        let section = self
            .doc
            .section_mut(TASKS_HEADING)
            .ok_or_else(|| WorkflowError::TaskNotFound(number.to_string()))?;
        section.body = progress::mark_complete(&section.body, number)
            .ok_or_else(|| WorkflowError::TaskNotFound(number.to_string()))?;

        if let Some(deps) = self.doc.section_mut(DEPENDENCIES_HEADING) {
            deps.body = progress::mark_link_complete(&deps.body, number);
        }
        Ok(())
    }

    /// Current marker counts of the task list.
    pub fn progress(&self) -> ProgressState {
        match self.doc.section(TASKS_HEADING) {
            Some(section) => ProgressState::from_markers(&section.body),
            None => ProgressState::default(),
        }
    }

    /// Rewrite the progress block from the task list.
    pub fn recalculate_progress(&mut self) -> ProgressState {
        let state = self.progress();
        if let Some(section) = self.doc.section_mut(PROGRESS_HEADING) {
            section.body = state.apply(&section.body);
        }
        state
    }

    /// Record a work session in the session log table.
    ///
    /// The "Not started" row is replaced by the first session; later sessions
    /// are inserted directly below the table divider. Returns `false` when
    /// the document has no session log table.
    pub fn log_session(&mut self, entry: &SessionEntry) -> bool {
        let Some(section) = self.doc.section_mut(PROGRESS_HEADING) else {
            return false;
        };
        let row = entry.to_string();

        if section.body.contains(NOT_STARTED_ROW) {
            section.body = section.body.replacen(NOT_STARTED_ROW, &row, 1);
            return true;
        }

        let Some(log_start) = section.body.find(SESSION_LOG_HEADING) else {
            return false;
        };
        let Some(header) = section.body[log_start..].find("| Date").map(|i| log_start + i) else {
            return false;
        };
        let Some(divider) = section.body[header..].find("| ----").map(|i| header + i) else {
            return false;
        };

        let insert_at = match section.body[divider..].find('\n') {
            Some(i) => divider + i + 1,
            None => {
                section.body.push('\n');
                section.body.len()
            }
        };
        section.body.insert_str(insert_at, &format!("{row}\n"));
        true
    }
}

/// The cycles tracker, `docs/cycles.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclesIndex {
    doc: MarkdownDocument,
}

impl CyclesIndex {
    pub fn parse(content: &str) -> Self {
        Self { doc: MarkdownDocument::parse(content) }
    }

    pub fn render(&self) -> String {
        self.doc.render()
    }

    /// Add a cycle to the `## Cycles` list.
    pub fn add_cycle(&mut self, number: &str, name: &str, dir_name: &str, duration: &str) -> bool {
        let Some(section) = self.doc.section_mut(CYCLES_HEADING) else {
            return false;
        };

        let entry = format!("- [ ] **[Cycle {number}: {name}](./cycles/{dir_name}/README.md)** - {duration}");
        if section.body.contains(NO_CYCLES_PLACEHOLDER) {
            section.body = section.body.replacen(NO_CYCLES_PLACEHOLDER, &entry, 1);
        } else {
            let kept = section.body.trim_end().len();
            section.body.truncate(kept);
            section.body.push('\n');
            section.body.push_str(&entry);
            section.body.push_str("\n\n");
        }
        true
    }

    /// Rewrite `**Total Cycles Planned**` wherever it appears.
    pub fn set_total_cycles(&mut self, total: usize) {
        let line = format!("**Total Cycles Planned**: {total}");
        self.doc.preamble =
            TOTAL_CYCLES.replace(&self.doc.preamble, regex::NoExpand(&line)).into_owned();
        if let Some(section) = self.doc.section_mut("## Overview") {
            section.body = TOTAL_CYCLES.replace(&section.body, regex::NoExpand(&line)).into_owned();
        }
    }
}

fn capture_hours(pattern: &Regex, text: &str) -> Option<f64> {
    pattern.captures(text).and_then(|caps| caps[1].parse().ok())
}
