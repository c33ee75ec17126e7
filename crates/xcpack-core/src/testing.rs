//! Test doubles for the command runner
//!
//! [`ScriptedRunner`] answers each invocation with the next scripted [`Step`]
//! and can materialise the files a real toolchain would have produced.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner, Invocation, OutputMode};

/// Scripted response to one invocation
#[derive(Debug, Clone, Default)]
pub struct Step {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    dirs: Vec<PathBuf>,
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl Step {
    /// Exit 0 with no output
    pub fn ok() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    /// Exit with the given non-zero code
    pub fn fail(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Create a directory (and parents) when this step runs
    pub fn creates_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Create a file with the given contents when this step runs
    pub fn creates_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.into(), contents.into()));
        self
    }
}

/// Runner that replays scripted steps instead of spawning processes
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    missing: HashSet<String>,
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(Invocation, OutputMode)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next invocation
    pub fn with_step(self, step: Step) -> Self {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(step);
        }
        self
    }

    /// Make `program` unresolvable
    pub fn with_missing_tool(mut self, program: impl Into<String>) -> Self {
        self.missing.insert(program.into());
        self
    }

    /// Invocations received so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .map(|(invocation, _)| invocation)
            .collect()
    }

    /// Invocations with the mode they were run in
    pub fn calls(&self) -> Vec<(Invocation, OutputMode)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Steps not consumed yet
    pub fn remaining(&self) -> usize {
        self.steps.lock().map(|s| s.len()).unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }

    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((invocation.clone(), mode));
        }

        let step = self.steps.lock().ok().and_then(|mut s| s.pop_front());
        let Some(step) = step else {
            return Ok(CommandOutput {
                exit_code: Some(127),
                stdout: String::new(),
                stderr: format!("no scripted response for: {invocation}"),
            });
        };

        for dir in &step.dirs {
            std::fs::create_dir_all(dir)?;
        }
        for (path, contents) in &step.files {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
        }

        let output = match mode {
            OutputMode::Captured => CommandOutput {
                exit_code: step.exit_code,
                stdout: step.stdout,
                stderr: step.stderr,
            },
            OutputMode::Streamed => CommandOutput {
                exit_code: step.exit_code,
                ..Default::default()
            },
        };
        Ok(output)
    }
}
