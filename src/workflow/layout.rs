//! Workspace layout.
//!
//! Where each workflow artifact lives relative to the workspace root, and
//! the checks that a workspace has been initialized.

use std::path::{Path, PathBuf};

use super::numbering::is_cycle_dir;
use super::store::DocumentStore;
use crate::core::{CycleConfig, Result, WorkflowError};

/// Paths of one workspace's workflow artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

/// A cycle directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDir {
    /// Directory name, e.g. `01-setup`
    pub name: String,

    /// Full path of the directory
    pub path: PathBuf,
}

impl CycleDir {
    pub fn readme(&self) -> PathBuf {
        self.path.join("README.md")
    }
}

impl Workspace {
    /// Workspace rooted at `root`, with `~` and environment variables expanded.
    pub fn new(root: &str) -> Self {
        let expanded = shellexpand::full(root).map_or_else(|_| root.to_string(), |s| s.into_owned());
        Self { root: PathBuf::from(expanded) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        CycleConfig::path(&self.root)
    }

    pub fn workflow_guide(&self) -> PathBuf {
        self.root.join("WORKFLOW.md")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    pub fn cycles_index(&self) -> PathBuf {
        self.docs_dir().join("cycles.md")
    }

    pub fn cycles_dir(&self) -> PathBuf {
        self.docs_dir().join("cycles")
    }

    pub fn pr_template(&self) -> PathBuf {
        self.root.join(".github").join("pull_request_template.md")
    }

    /// Artifacts an initialized workspace must have, as display names.
    pub fn missing_artifacts(&self, store: &dyn DocumentStore) -> Vec<String> {
        let checks = [
            (self.config_file(), ".cycles-config.json"),
            (self.workflow_guide(), "WORKFLOW.md"),
            (self.cycles_index(), "docs/cycles.md"),
            (self.cycles_dir(), "docs/cycles/ directory"),
        ];

        checks
            .into_iter()
            .filter(|(path, _)| !store.exists(path))
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Fail with the list of missing artifacts unless fully initialized.
    pub fn require_initialized(&self, store: &dyn DocumentStore) -> Result<()> {
        let missing = self.missing_artifacts(store);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::NotInitialized { missing })
        }
    }

    /// Create `docs/` and `docs/cycles/`.
    pub fn ensure_docs_structure(&self, store: &dyn DocumentStore) -> Result<()> {
        store.create_dir_all(&self.cycles_dir())?;
        Ok(())
    }

    /// Names of the existing cycle directories.
    pub fn cycle_names(&self, store: &dyn DocumentStore) -> Result<Vec<String>> {
        let cycles_dir = self.cycles_dir();
        Ok(store
            .list(&cycles_dir)?
            .into_iter()
            .filter(|name| store.is_dir(&cycles_dir.join(name)))
            .collect())
    }

    /// Locate the directory of cycle `number` (already zero-padded).
    pub fn find_cycle(&self, store: &dyn DocumentStore, number: &str) -> Result<CycleDir> {
        let cycles_dir = self.cycles_dir();
        self.cycle_names(store)?
            .into_iter()
            .find(|name| is_cycle_dir(name, number))
            .map(|name| CycleDir { path: cycles_dir.join(&name), name })
            .ok_or_else(|| WorkflowError::CycleNotFound(number.to_string()))
    }
}
