//! Toolchain stages
//!
//! Each stage invokes the toolchain once and then re-checks the filesystem:
//! a zero exit without the expected artifact is still a failure.

mod archive;
mod export;

pub use archive::{archive_invocation, run_archive};
pub use export::{export_invocation, run_export, ExportedPackage};

/// The build and archival toolchain
pub const XCODEBUILD: &str = "xcodebuild";
