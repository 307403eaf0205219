//! `git` and `gh` command wrappers.

use std::path::Path;

use crate::core::{CommandOutput, CommandRunner, GitConfig, PrConfig, Result, WorkflowError};

/// Runs `git` in one working directory.
pub struct GitCli<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a GitConfig,
    cwd: &'a Path,
}

impl<'a> GitCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a GitConfig, cwd: &'a Path) -> Self {
        Self { runner, config, cwd }
    }

    /// `git add .`
    pub fn stage_all(&self) -> Result<()> {
        self.run("Staging", &["add", "."]).map(drop)
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> Result<CommandOutput> {
        self.run("Commit", &["commit", "-m", message])
    }

    /// `git push -u <remote> <branch>`, refusing protected branches.
    pub fn push(&self, branch: &str) -> Result<CommandOutput> {
        if self.config.is_protected(branch) {
            return Err(WorkflowError::ProtectedBranch(branch.to_string()));
        }
        self.run("Push", &["push", "-u", &self.config.remote, branch])
    }

    fn run(&self, operation: &str, args: &[&str]) -> Result<CommandOutput> {
        tracing::info!(program = %self.config.program, ?args, "Running git");
        let output = self.runner.run(&self.config.program, args, self.cwd)?;
        if output.success {
            Ok(output)
        } else {
            tracing::warn!(operation, stderr = %output.stderr.trim(), "git command failed");
            Err(WorkflowError::command(operation, output.error_message()))
        }
    }
}

/// Opens pull requests with the PR-hosting CLI.
pub struct PullRequestCli<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a PrConfig,
    cwd: &'a Path,
}

impl<'a> PullRequestCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a PrConfig, cwd: &'a Path) -> Self {
        Self { runner, config, cwd }
    }

    /// `gh pr create --title <title> --body <body> --base <base>`
    ///
    /// Returns the CLI's output (normally the new PR's URL).
    pub fn create(&self, title: &str, body: &str, base: &str) -> Result<String> {
        let args = ["pr", "create", "--title", title, "--body", body, "--base", base];
        tracing::info!(program = %self.config.program, title, base, "Creating pull request");

        let output = self
            .runner
            .run(&self.config.program, &args, self.cwd)
            .map_err(|e| WorkflowError::command("Pull request creation", e.to_string()))?;

        if output.success {
            Ok(output.stdout.trim().to_string())
        } else {
            tracing::warn!(stderr = %output.stderr.trim(), "Pull request creation failed");
            Err(WorkflowError::command("Pull request creation", output.error_message()))
        }
    }
}
