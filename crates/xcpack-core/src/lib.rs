//! xcpack core - archive and export pipeline for Xcode projects
//!
//! This crate turns an Xcode project into a timestamped, distributable `.ipa`
//! by driving `xcodebuild` through a fixed sequence of stages:
//!
//! 1. validate the environment (tools on PATH, project file, scheme)
//! 2. prepare the build directory
//! 3. render `ExportOptions.plist`
//! 4. archive
//! 5. export, relocate and measure the package
//!
//! All toolchain calls go through [`CommandRunner`] and all user-facing
//! progress through [`Reporter`], so the whole pipeline can run against
//! [`testing::ScriptedRunner`] and [`RecordingReporter`] in tests.

pub mod config;
pub mod error;
pub mod export_options;
pub mod interrupt;
pub mod paths;
pub mod pipeline;
pub mod reporter;
pub mod runner;
pub mod stages;
pub mod testing;
pub mod validate;
pub mod workspace;

pub use config::{BuildConfiguration, ExportMethod, Overrides, ProjectSettings, SigningStyle};
pub use error::{ConfigError, PackError, Result};
pub use paths::ArtifactPaths;
pub use pipeline::{Pipeline, RunSummary, Stage};
pub use reporter::{Level, RecordingReporter, Reporter};
pub use runner::{CommandOutput, CommandRunner, Invocation, OutputMode, SystemRunner};
pub use stages::ExportedPackage;
pub use workspace::Workspace;
