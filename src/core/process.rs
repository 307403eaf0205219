//! External process execution.
//!
//! Version control and PR hosting go through the [`CommandRunner`] trait so
//! tools can be exercised against a scripted runner in tests.

use std::path::Path;
use std::process::{Command as ProcessCommand, Stdio};
use std::time::Instant;

/// Captured result of running an external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the program exited with status 0
    pub success: bool,

    /// Standard output
    pub stdout: String,

    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, stdout: stdout.into(), stderr: String::new() }
    }

    /// Failed output with the given stderr.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self { success: false, stdout: String::new(), stderr: stderr.into() }
    }

    /// Best available description of a failure: stderr, else stdout.
    pub fn error_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs an external program to completion.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`, capturing its output.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`]; only a
    /// failure to spawn the program is an `Err`.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput>;
}

/// Runs programs directly, without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput> {
        let start = Instant::now();

        let output = ProcessCommand::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        tracing::debug!(
            program,
            ?args,
            status = ?output.status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ran external command"
        );

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_stderr() {
        let output = CommandOutput {
            success: false,
            stdout: "some output".to_string(),
            stderr: "fatal: not a git repository\n".to_string(),
        };
        assert_eq!(output.error_message(), "fatal: not a git repository");

        let output = CommandOutput::failed("");
        assert_eq!(output.error_message(), "");

        let output = CommandOutput { stdout: "nothing to commit\n".to_string(), ..output };
        assert_eq!(output.error_message(), "nothing to commit");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = SystemRunner::new().run("echo", &["hello"], temp_dir.path()).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_failure() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = SystemRunner::new().run("false", &[], temp_dir.path()).unwrap();
        assert!(!output.success);
    }

    #[test]
    fn test_system_runner_missing_program() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result =
            SystemRunner::new().run("definitely-not-a-real-program-xyz", &[], temp_dir.path());
        assert!(result.is_err());
    }
}
