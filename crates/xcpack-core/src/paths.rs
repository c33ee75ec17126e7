//! Artifact locations derived from the configuration and the run timestamp

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::config::BuildConfiguration;

/// Extension of the exported package
pub const PACKAGE_EXTENSION: &str = "ipa";

/// Timestamp embedded in the final package name (`yyyyMMdd_HHmmss`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the rendered export options document
pub const EXPORT_OPTIONS_FILE: &str = "ExportOptions.plist";

/// Name of the transient export subdirectory
pub const EXPORT_DIR: &str = "export";

/// Every path a run reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<build>/<name>.xcarchive`
    pub archive: PathBuf,
    /// `<build>/export`, removed at the end of a successful run
    pub export_dir: PathBuf,
    /// `<build>/ExportOptions.plist`
    pub export_options: PathBuf,
    /// Where the toolchain leaves the package: `<build>/export/<name>.ipa`
    pub exported_package: PathBuf,
    /// Final location: `<build>/<name>_<yyyyMMdd>_<HHmmss>.ipa`
    pub package: PathBuf,
}

impl ArtifactPaths {
    pub fn new(config: &BuildConfiguration, timestamp: NaiveDateTime) -> Self {
        let build_dir = &config.build_dir;
        let export_dir = build_dir.join(EXPORT_DIR);

        Self {
            archive: build_dir.join(format!("{}.xcarchive", config.project_name)),
            exported_package: export_dir.join(format!(
                "{}.{}",
                config.project_name, PACKAGE_EXTENSION
            )),
            export_dir,
            export_options: build_dir.join(EXPORT_OPTIONS_FILE),
            package: build_dir.join(package_file_name(&config.project_name, timestamp)),
        }
    }
}

/// `<name>_<yyyyMMdd>_<HHmmss>.ipa`
pub fn package_file_name(project_name: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        project_name,
        timestamp.format(TIMESTAMP_FORMAT),
        PACKAGE_EXTENSION
    )
}
