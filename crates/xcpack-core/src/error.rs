//! Error types for xcpack

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PackError
pub type Result<T> = std::result::Result<T, PackError>;

/// Main error type for pipeline operations
#[derive(Debug, Error)]
pub enum PackError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required external command is not on PATH
    #[error("Required tool '{tool}' not found. Install the Xcode command line tools: xcode-select --install")]
    ToolNotFound { tool: String },

    /// The project or workspace file is missing
    #[error("Project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// The scheme is not listed by the toolchain
    #[error("Scheme '{scheme}' not found (available: {})", format_available(.available))]
    SchemeNotFound {
        scheme: String,
        available: Vec<String>,
    },

    /// Command could not be started
    #[error("Failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Command ran and returned a non-zero status
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Artifact not found after a reported-successful invocation
    #[error("{stage} reported success but no artifact exists at {expected_path}")]
    ArtifactMissing {
        stage: &'static str,
        expected_path: PathBuf,
    },

    /// A package with the same timestamped name already exists
    #[error("Refusing to overwrite existing package at {path}")]
    PackageExists { path: PathBuf },

    /// Build directory could not be created or removed
    #[error("Build directory operation failed on {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ExportOptions document could not be serialized
    #[error("Failed to render export options: {0}")]
    Render(String),

    /// Operator interrupt
    #[error("Build interrupted by user")]
    Interrupted,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

impl PackError {
    /// Create a workspace error for the given path
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Captured stderr of a failed invocation, if any was collected
    pub fn captured_stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }

    /// Get exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::ToolNotFound { .. } => 3,
            Self::ProjectNotFound { .. } => 3,
            Self::SchemeNotFound { .. } => 3,
            Self::Spawn { .. } => 10,
            Self::CommandFailed { .. } => 10,
            Self::ArtifactMissing { .. } => 13,
            Self::PackageExists { .. } => 13,
            Self::Workspace { .. } => 7,
            Self::Render(_) => 7,
            Self::Interrupted => 130,
            Self::Io(_) => 7,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}
