//! External command execution
//!
//! Every toolchain call goes through [`CommandRunner`] so the pipeline can be
//! driven by [`SystemRunner`] in production and by a scripted fake in tests.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{PackError, Result};

/// Whether child output is captured or streamed to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pipe stdout/stderr so they can be inspected or surfaced on failure
    Captured,
    /// Inherit the terminal; nothing is collected
    Streamed,
}

impl OutputMode {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Streamed
        } else {
            Self::Captured
        }
    }
}

/// A single command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Value following `flag` in the argument list
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Empty in streamed mode
    pub stdout: String,
    /// Empty in streamed mode
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Convert a non-zero exit into [`PackError::CommandFailed`]
    pub fn check(self, invocation: &Invocation) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(PackError::CommandFailed {
                command: invocation.to_string(),
                exit_code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Capability for locating and running external programs
pub trait CommandRunner: Send + Sync {
    /// Resolve a program on the execution path
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Run to completion, blocking the caller
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        debug!(command = %invocation, ?mode, "running command");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        let spawn_err = |source| PackError::Spawn {
            command: invocation.to_string(),
            source,
        };

        let output = match mode {
            OutputMode::Captured => {
                let output = cmd.stdin(Stdio::null()).output().map_err(spawn_err)?;
                CommandOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
            OutputMode::Streamed => {
                let status = cmd.status().map_err(spawn_err)?;
                CommandOutput {
                    exit_code: status.code(),
                    ..Default::default()
                }
            }
        };

        debug!(command = %invocation.program, exit_code = ?output.exit_code, "command finished");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display_quotes_spaces() {
        let inv = Invocation::new("xcodebuild")
            .arg("-archivePath")
            .arg("/tmp/My App/App.xcarchive");

        assert_eq!(
            inv.to_string(),
            "xcodebuild -archivePath \"/tmp/My App/App.xcarchive\""
        );
    }

    #[test]
    fn test_flag_value() {
        let inv = Invocation::new("xcodebuild").args(["archive", "-scheme", "App"]);

        assert_eq!(inv.flag_value("-scheme"), Some("App"));
        assert_eq!(inv.flag_value("-project"), None);
        assert!(inv.has_arg("archive"));
    }

    #[test]
    fn test_check_maps_failure() {
        let inv = Invocation::new("xcodebuild").arg("archive");
        let output = CommandOutput {
            exit_code: Some(65),
            stdout: String::new(),
            stderr: "** ARCHIVE FAILED **".to_string(),
        };

        match output.check(&inv).unwrap_err() {
            PackError::CommandFailed {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "xcodebuild archive");
                assert_eq!(exit_code, Some(65));
                assert_eq!(stderr, "** ARCHIVE FAILED **");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_signal_termination_is_failure() {
        let output = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let runner = SystemRunner;
        let inv = Invocation::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);

        let output = runner.run(&inv, OutputMode::Captured).unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let runner = SystemRunner;
        let inv = Invocation::new("xcpack-definitely-not-a-real-tool");

        let err = runner.run(&inv, OutputMode::Captured).unwrap_err();
        assert!(matches!(err, PackError::Spawn { .. }));
        assert!(runner.resolve("xcpack-definitely-not-a-real-tool").is_none());
    }
}
