//! Task record extraction.
//!
//! A task document is parsed for its heading (`# Task 003: Title`) and its
//! `**Must complete first:**` line. Documents without a task heading are not
//! tasks; cycle-level extraction reports them as skipped instead of failing.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::numbering::is_task_file;
use super::store::DocumentStore;
use crate::core::Result;

/// Dependency text meaning "no dependencies".
pub const NO_DEPENDENCIES: &str = "None (can start immediately)";

static TASK_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#{1,6}[ \t]*Task (\d{3}):[ \t]*(.+?)[ \t]*\r?$").expect("valid heading pattern")
});
static MUST_COMPLETE_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)Must complete first:(?:\*\*)?[ \t]*(.*?)[ \t]*\r?$")
        .expect("valid dependency pattern")
});
static TASK_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Task (\d{3})").expect("valid reference pattern"));

/// One task as recovered from its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// Three-digit task number
    pub number: String,

    /// Task title
    pub title: String,

    /// Numbers of the tasks that must finish first, in order of appearance
    pub dependencies: Vec<String>,

    /// Document file name, used for links
    pub file_name: String,
}

impl TaskRecord {
    /// Create a record.
    pub fn new(
        number: impl Into<String>,
        title: impl Into<String>,
        dependencies: Vec<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            dependencies,
            file_name: file_name.into(),
        }
    }

    /// Parse one task document.
    ///
    /// Returns `None` when the document has no `Task NNN: Title` heading.
    pub fn parse(content: &str, file_name: &str) -> Option<Self> {
        let heading = TASK_HEADING.captures(content)?;
        let dependencies = parse_dependencies(&dependency_text(content));

        Some(Self {
            number: heading[1].to_string(),
            title: heading[2].to_string(),
            dependencies,
            file_name: file_name.to_string(),
        })
    }

    /// Whether the task can start without waiting on anything.
    pub fn is_independent(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// The declared dependency text of a task document, or the sentinel.
pub fn dependency_text(content: &str) -> String {
    MUST_COMPLETE_FIRST
        .captures(content)
        .map(|caps| caps[1].to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_DEPENDENCIES.to_string())
}

/// Collect the task numbers referenced by dependency text.
///
/// The sentinel means no dependencies; otherwise every `Task NNN` token is
/// collected once, in order of first appearance.
pub fn parse_dependencies(text: &str) -> Vec<String> {
    if text.trim() == NO_DEPENDENCIES {
        return Vec::new();
    }

    let mut numbers: Vec<String> = Vec::new();
    for caps in TASK_REFERENCE.captures_iter(text) {
        let number = &caps[1];
        if !numbers.iter().any(|n| n == number) {
            numbers.push(number.to_string());
        }
    }
    numbers
}

/// Every task record of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleRecords {
    /// Parsed tasks in file-name order
    pub records: Vec<TaskRecord>,

    /// Task-named files that had no task heading
    pub skipped: Vec<String>,
}

impl CycleRecords {
    /// Read every `NNN-*.md` document in a cycle directory.
    pub fn load(store: &dyn DocumentStore, cycle_dir: &Path) -> Result<Self> {
        let mut result = Self::default();

        for name in store.list(cycle_dir)?.into_iter().filter(|n| is_task_file(n)) {
            let Some(content) = store.read(&cycle_dir.join(&name))? else {
                continue;
            };

            match TaskRecord::parse(&content, &name) {
                Some(record) => result.records.push(record),
                None => {
                    tracing::warn!(file = %name, "Skipping document without a task heading");
                    result.skipped.push(name);
                }
            }
        }

        Ok(result)
    }

    /// Dependency references that name no task in this cycle, as
    /// `(task, missing dependency)` pairs.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .flat_map(|record| {
                record
                    .dependencies
                    .iter()
                    .filter(|dep| !self.records.iter().any(|r| &r.number == *dep))
                    .map(|dep| (record.number.clone(), dep.clone()))
            })
            .collect()
    }
}
