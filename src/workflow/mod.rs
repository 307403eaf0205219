//! Cycle workflow engine.
//!
//! Everything that reads or rewrites workflow documents lives here.
//!
//! ## Documents
//!
//! - `.cycles-config.json` - Sizing and cycle length
//! - `WORKFLOW.md` - Workflow guide
//! - `docs/cycles.md` - Cycles tracker
//! - `docs/cycles/NN-name/README.md` - Cycle task list, dependency groups, progress
//! - `docs/cycles/NN-name/NNN-task.md` - Task documents
//!
//! ## Engine
//!
//! - [`CycleRecords`] - Task records recovered from a cycle's documents
//! - [`DependencyGroups`] - Parallel execution tiers
//! - [`ProgressState`] - Marker counts, percentage and bar

mod document;
mod grouping;
mod layout;
mod numbering;
mod progress;
mod readme;
mod records;
mod store;
mod templates;

pub use document::{MarkdownDocument, Section};
pub use grouping::{
    parallelization_status, DependencyGroup, DependencyGroups, GroupPosition,
    EMPTY_GROUPS_PLACEHOLDER, PARALLELIZATION_TIP,
};
pub use layout::{CycleDir, Workspace};
pub use numbering::{
    is_task_file, next_cycle_number, next_task_number, pad_number, slugify, CYCLE_WIDTH,
    TASK_WIDTH,
};
pub use progress::{mark_complete, ProgressState, BAR_WIDTH};
pub use readme::{
    CycleReadme, CyclesIndex, SessionEntry, DEPENDENCIES_HEADING, NOT_STARTED_ROW,
    NO_CYCLES_PLACEHOLDER, NO_TASKS_PLACEHOLDER, PROGRESS_HEADING, SESSION_LOG_HEADING,
    TASKS_HEADING,
};
pub use records::{dependency_text, parse_dependencies, CycleRecords, TaskRecord, NO_DEPENDENCIES};
pub use store::{DocumentStore, FsStore};
pub use templates::{render, today, TemplateKind, TemplateVars};
