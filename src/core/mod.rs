//! Core types shared by the workflow engine and the tool handlers.
//!
//! This module contains the error type, sizing vocabulary, configuration
//! and the external process seam.

mod config;
mod error;
mod process;
mod sizing;

pub use config::{
    CycleConfig, GitConfig, PrConfig, ServerConfig, SizingOverrides, CONFIG_ENV_VAR,
    CONFIG_FILENAME,
};
pub use error::{Result, WorkflowError};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use sizing::{
    CycleDuration, DetailLevel, Difficulty, DurationUnit, SimpleTier, SizingMode, TaskDuration,
    TaskSizing,
};
