//! Version control and pull request integration.
//!
//! Reading repository state (the current branch) goes through libgit2 when
//! the `git` feature is enabled. Anything that changes the repository or
//! talks to a remote runs the user's own `git` and `gh` executables, so their
//! credentials, hooks and signing settings apply.

mod cli;

use std::path::Path;

pub use cli::{GitCli, PullRequestCli};

use crate::core::{CommandRunner, GitConfig, Result, WorkflowError};

/// Git repository wrapper for read-only queries.
#[cfg(feature = "git")]
pub struct GitRepository {
    repo: git2::Repository,
}

#[cfg(feature = "git")]
impl GitRepository {
    /// Open the repository containing `path`.
    ///
    /// This will search up the directory tree to find a Git repository.
    #[must_use]
    pub fn discover(path: impl AsRef<Path>) -> Option<Self> {
        git2::Repository::discover(path.as_ref()).ok().map(|repo| Self { repo })
    }

    /// Get the current branch name.
    ///
    /// A branch without commits yet still has a name; a detached HEAD has none.
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head.shorthand().map(String::from),
            Ok(_) => None,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD").ok()?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(String::from)
            }
            Err(_) => None,
        }
    }
}

/// Without libgit2 there is no in-process repository access.
#[cfg(not(feature = "git"))]
pub struct GitRepository;

#[cfg(not(feature = "git"))]
impl GitRepository {
    #[must_use]
    pub fn discover(_path: impl AsRef<Path>) -> Option<Self> {
        None
    }

    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        None
    }
}

/// Name of the branch checked out in `cwd`.
///
/// Asks libgit2 first and falls back to `git rev-parse --abbrev-ref HEAD`.
pub fn current_branch(runner: &dyn CommandRunner, config: &GitConfig, cwd: &Path) -> Result<String> {
    if let Some(branch) = GitRepository::discover(cwd).and_then(|repo| repo.current_branch()) {
        return Ok(branch);
    }

    let output = runner.run(&config.program, &["rev-parse", "--abbrev-ref", "HEAD"], cwd)?;
    let branch = output.stdout.trim();
    if !output.success || branch.is_empty() || branch == "HEAD" {
        tracing::debug!(stderr = %output.stderr.trim(), "Could not resolve current branch");
        return Err(WorkflowError::NoBranch);
    }
    Ok(branch.to_string())
}

/// Conventional commit subject for a cycle: `feat(cycle-NN): message`.
pub fn commit_subject(cycle_number: &str, message: &str) -> String {
    format!("feat(cycle-{cycle_number}): {message}")
}

/// Full commit message, with the body after a blank line.
pub fn commit_message(cycle_number: &str, message: &str, body: Option<&str>) -> String {
    let subject = commit_subject(cycle_number, message);
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => format!("{subject}\n\n{body}"),
        None => subject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CommandOutput;

    struct FixedRunner(CommandOutput);

    impl CommandRunner for FixedRunner {
        fn run(&self, _: &str, _: &[&str], _: &Path) -> std::io::Result<CommandOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(commit_message("01", "add schema", None), "feat(cycle-01): add schema");
        assert_eq!(
            commit_message("01", "add schema", Some("- users table\n")),
            "feat(cycle-01): add schema\n\n- users table"
        );
        assert_eq!(commit_message("02", "fix", Some("  ")), "feat(cycle-02): fix");
    }

    #[test]
    fn test_current_branch_falls_back_to_cli() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let runner = FixedRunner(CommandOutput::ok("feat/cycle-01-task-001\n"));
        let branch = current_branch(&runner, &GitConfig::default(), temp_dir.path()).unwrap();
        assert_eq!(branch, "feat/cycle-01-task-001");
    }

    #[test]
    fn test_detached_head_is_no_branch() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let runner = FixedRunner(CommandOutput::ok("HEAD\n"));
        let result = current_branch(&runner, &GitConfig::default(), temp_dir.path());
        assert!(matches!(result, Err(WorkflowError::NoBranch)));
    }

    #[cfg(feature = "git")]
    #[test]
    fn test_unborn_branch_has_a_name() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = git2::Repository::init(temp_dir.path()).unwrap();
        repo.set_head("refs/heads/feat/cycle-01-task-001-setup").unwrap();

        let git = GitRepository::discover(temp_dir.path()).unwrap();
        assert_eq!(git.current_branch().as_deref(), Some("feat/cycle-01-task-001-setup"));
    }
}
