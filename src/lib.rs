//! # Cycles MCP
//!
//! MCP server for cycle-based development workflows.
//!
//! Work is planned in numbered cycles, each holding numbered task documents.
//! The server scaffolds those markdown documents, reads dependency
//! declarations back out of them, groups tasks into tiers that can be worked
//! in parallel and keeps the progress indicators in each cycle README in
//! sync with the task checkboxes.
//!
//! ## Features
//!
//! - **Workflow scaffolding**: workflow guide, cycles tracker, cycle READMEs and task documents
//! - **Dependency groups**: tasks layered into parallel tiers, cycles reported instead of looping
//! - **Progress tracking**: idempotent recount of checkboxes into a summary and a 20-glyph bar
//! - **Git workflow**: conventional commits, protected-branch aware pushes, PRs through `gh`
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve MCP on stdio (what an MCP client launches)
//! cycles-mcp
//!
//! # List the tools
//! cycles-mcp tools
//!
//! # Call one tool directly
//! cycles-mcp call update-progress --args '{"workspaceRoot": ".", "cycleNumber": "01"}'
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod core;
pub mod git;
pub mod mcp;
pub mod tools;
pub mod workflow;

// Re-export commonly used types
pub use core::{CycleConfig, Result, ServerConfig, WorkflowError};
pub use mcp::CyclesServer;
pub use workflow::{DependencyGroups, ProgressState, TaskRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "cycles-mcp";
