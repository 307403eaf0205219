//! Configuration management.
//!
//! Two layers of configuration exist:
//!
//! - [`CycleConfig`] lives in each workspace as `.cycles-config.json` and is
//!   written by `init-workflow`. It drives task sizing and cycle length.
//! - [`ServerConfig`] is the server's own TOML settings (git remote, base
//!   branch, executables), shared by every workspace the server touches.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::error::{Result, WorkflowError};
use super::sizing::{
    CycleDuration, DetailLevel, Difficulty, SimpleTier, SizingMode, TaskDuration, TaskSizing,
};
use crate::workflow::DocumentStore;

/// File name of the per-workspace workflow configuration.
pub const CONFIG_FILENAME: &str = ".cycles-config.json";

/// Environment variable that points at a server config file.
pub const CONFIG_ENV_VAR: &str = "CYCLES_CONFIG";

/// Bounds for `hours_per_cycle`.
const MIN_HOURS_PER_CYCLE: f64 = 1.0;
const MAX_HOURS_PER_CYCLE: f64 = 500.0;

/// Per-workspace workflow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// How task sizes are chosen
    pub sizing_mode: SizingMode,

    /// Tier used in simple mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_tier: Option<SimpleTier>,

    /// Difficulty used in granular mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    /// Task duration used in granular mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_duration: Option<TaskDuration>,

    /// Detail level used in granular mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,

    /// Length of one cycle
    #[serde(default)]
    pub cycle_duration: CycleDuration,

    /// Hours available in one cycle
    pub hours_per_cycle: f64,
}

/// Per-task overrides of the configured sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizingOverrides {
    pub difficulty: Option<Difficulty>,
    pub duration: Option<TaskDuration>,
    pub detail_level: Option<DetailLevel>,
}

impl CycleConfig {
    /// Default configuration: simple mode, mid tier, one-week cycles, 8 hours.
    pub fn simple(tier: SimpleTier) -> Self {
        Self {
            sizing_mode: SizingMode::Simple,
            simple_tier: Some(tier),
            difficulty: None,
            task_duration: None,
            detail_level: None,
            cycle_duration: CycleDuration::default(),
            hours_per_cycle: 8.0,
        }
    }

    /// Check value ranges and the fields each sizing mode requires.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HOURS_PER_CYCLE..=MAX_HOURS_PER_CYCLE).contains(&self.hours_per_cycle) {
            return Err(WorkflowError::InvalidConfig(format!(
                "hours_per_cycle must be between {MIN_HOURS_PER_CYCLE} and {MAX_HOURS_PER_CYCLE}, got {}",
                self.hours_per_cycle
            )));
        }

        self.cycle_duration.validate().map_err(WorkflowError::InvalidConfig)?;

        match self.sizing_mode {
            SizingMode::Simple if self.simple_tier.is_none() => Err(WorkflowError::InvalidConfig(
                "simple_tier is required when sizing_mode is 'simple'".to_string(),
            )),
            SizingMode::Granular
                if self.difficulty.is_none()
                    || self.task_duration.is_none()
                    || self.detail_level.is_none() =>
            {
                Err(WorkflowError::InvalidConfig(
                    "difficulty, task_duration and detail_level are required when sizing_mode is 'granular'"
                        .to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Resolve the sizing for one task, applying any per-task overrides.
    pub fn task_sizing(&self, overrides: SizingOverrides) -> Result<TaskSizing> {
        let base = match self.sizing_mode {
            SizingMode::Simple => self.simple_tier.map(Difficulty::tier_sizing),
            SizingMode::Granular => match (self.difficulty, self.task_duration, self.detail_level)
            {
                (Some(difficulty), Some(duration), Some(detail_level)) => {
                    Some(TaskSizing { difficulty, duration, detail_level })
                }
                _ => None,
            },
        };

        let base = base.ok_or_else(|| {
            WorkflowError::InvalidConfig(format!(
                "sizing mode '{}' is missing its settings",
                self.sizing_mode.as_str()
            ))
        })?;

        Ok(TaskSizing {
            difficulty: overrides.difficulty.unwrap_or(base.difficulty),
            duration: overrides.duration.unwrap_or(base.duration),
            detail_level: overrides.detail_level.unwrap_or(base.detail_level),
        })
    }

    /// Path of the config file inside a workspace.
    pub fn path(workspace_root: &Path) -> PathBuf {
        workspace_root.join(CONFIG_FILENAME)
    }

    /// Load and validate the workspace config.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(store: &dyn DocumentStore, workspace_root: &Path) -> Result<Option<Self>> {
        let Some(content) = store.read(&Self::path(workspace_root))? else {
            return Ok(None);
        };

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| WorkflowError::InvalidConfig(format!("{CONFIG_FILENAME} is corrupt: {e}")))?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Load the workspace config, treating a missing file as an error.
    pub fn require(store: &dyn DocumentStore, workspace_root: &Path) -> Result<Self> {
        Self::load(store, workspace_root)?.ok_or_else(|| WorkflowError::NotInitialized {
            missing: vec![CONFIG_FILENAME.to_string()],
        })
    }

    /// Save the config to the workspace.
    pub fn save(&self, store: &dyn DocumentStore, workspace_root: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        store.write(&Self::path(workspace_root), &content)?;
        Ok(())
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self::simple(Difficulty::Mid)
    }
}

/// Server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Version control settings
    pub git: GitConfig,

    /// Pull request settings
    pub pr: PrConfig,
}

/// Version control settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Executable used for commit and push
    pub program: String,

    /// Remote to push to
    pub remote: String,

    /// Branch pull requests target
    pub base_branch: String,

    /// Branches that may never be pushed to directly
    pub protected_branches: Vec<String>,
}

/// Pull request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrConfig {
    /// PR-hosting CLI executable
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            remote: "origin".to_string(),
            base_branch: "main".to_string(),
            protected_branches: vec!["main".to_string(), "master".to_string()],
        }
    }
}

impl Default for PrConfig {
    fn default() -> Self {
        Self { program: "gh".to_string() }
    }
}

impl GitConfig {
    /// Whether pushing to `branch` is refused.
    pub fn is_protected(&self, branch: &str) -> bool {
        branch == self.base_branch || self.protected_branches.iter().any(|b| b == branch)
    }
}

impl ServerConfig {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. the file named by `$CYCLES_CONFIG`
    /// 2. `.cycles.toml` in current directory
    /// 3. `~/.config/cycles/config.toml`
    /// 4. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(shellexpand::tilde(&path).as_ref());
            return Self::load_from_file(&path);
        }

        let local_config = PathBuf::from(".cycles.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_dir().map(|d| d.join("config.toml")) {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded server config");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cycles"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sizing::DurationUnit;
    use crate::workflow::FsStore;

    fn granular() -> CycleConfig {
        CycleConfig {
            sizing_mode: SizingMode::Granular,
            simple_tier: None,
            difficulty: Some(Difficulty::Senior),
            task_duration: Some(TaskDuration::FourHours),
            detail_level: Some(DetailLevel::Low),
            cycle_duration: CycleDuration { unit: DurationUnit::Months, value: 1 },
            hours_per_cycle: 40.0,
        }
    }

    #[test]
    fn test_default_config() {
        let config = CycleConfig::default();
        assert_eq!(config.sizing_mode, SizingMode::Simple);
        assert_eq!(config.simple_tier, Some(Difficulty::Mid));
        assert_eq!(config.cycle_duration, CycleDuration { unit: DurationUnit::Weeks, value: 1 });
        assert!((config.hours_per_cycle - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_simple_config() {
        let json = r#"{
            "sizing_mode": "simple",
            "simple_tier": "mid",
            "cycle_duration": { "unit": "weeks", "value": 2 },
            "hours_per_cycle": 16
        }"#;
        let config: CycleConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.simple_tier, Some(Difficulty::Mid));
    }

    #[test]
    fn test_validate_granular_config() {
        assert!(granular().validate().is_ok());
    }

    #[test]
    fn test_reject_invalid_sizing_mode() {
        let json = r#"{ "sizing_mode": "invalid", "hours_per_cycle": 16 }"#;
        assert!(serde_json::from_str::<CycleConfig>(json).is_err());
    }

    #[test]
    fn test_reject_hours_over_limit() {
        let mut config = CycleConfig::default();
        config.hours_per_cycle = 501.0;
        assert!(matches!(config.validate(), Err(WorkflowError::InvalidConfig(_))));
    }

    #[test]
    fn test_reject_granular_without_settings() {
        let mut config = granular();
        config.detail_level = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_task_sizing_with_overrides() {
        let config = CycleConfig::default();
        let sizing = config
            .task_sizing(SizingOverrides {
                duration: Some(TaskDuration::EightHours),
                ..SizingOverrides::default()
            })
            .unwrap();
        assert_eq!(sizing.difficulty, Difficulty::Mid);
        assert_eq!(sizing.duration, TaskDuration::EightHours);
        assert_eq!(sizing.detail_level, DetailLevel::Medium);
    }

    #[test]
    fn test_load_missing_and_save_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FsStore::new();

        assert!(CycleConfig::load(&store, temp_dir.path()).unwrap().is_none());

        let config = granular();
        config.save(&store, temp_dir.path()).unwrap();
        let loaded = CycleConfig::load(&store, temp_dir.path()).unwrap();
        assert_eq!(loaded, Some(config));
    }

    #[test]
    fn test_load_corrupt_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();

        let err = CycleConfig::load(&FsStore::new(), temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_server_config_deserialization() {
        let toml_str = r#"
            [git]
            remote = "upstream"
            base_branch = "develop"

            [pr]
            program = "/usr/local/bin/gh"
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert_eq!(config.git.base_branch, "develop");
        assert_eq!(config.git.program, "git");
        assert_eq!(config.pr.program, "/usr/local/bin/gh");
    }

    #[test]
    fn test_protected_branches() {
        let git = GitConfig { base_branch: "develop".to_string(), ..GitConfig::default() };
        assert!(git.is_protected("develop"));
        assert!(git.is_protected("master"));
        assert!(!git.is_protected("feat/cycle-01-task-001-setup"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_from_env_var() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("cycles.toml");
        std::fs::write(&path, "[git]\nremote = \"fork\"\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let loaded = ServerConfig::load();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(loaded.unwrap().git.remote, "fork");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_pointing_nowhere_is_an_error() {
        std::env::set_var(CONFIG_ENV_VAR, "/nonexistent/cycles.toml");
        let loaded = ServerConfig::load();
        std::env::remove_var(CONFIG_ENV_VAR);

        let err = loaded.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cycles.toml"));
    }
}
