//! Export stage

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::config::BuildConfiguration;
use crate::error::{PackError, Result};
use crate::export_options::write_export_options;
use crate::paths::ArtifactPaths;
use crate::reporter::Reporter;
use crate::runner::{CommandRunner, Invocation, OutputMode};
use crate::workspace::remove_tree;

use super::XCODEBUILD;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// The relocated package
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPackage {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ExportedPackage {
    /// Size in mebibytes (1024²)
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MIB
    }
}

/// Command line for `xcodebuild -exportArchive`
pub fn export_invocation(config: &BuildConfiguration, paths: &ArtifactPaths) -> Invocation {
    Invocation::new(XCODEBUILD)
        .arg("-exportArchive")
        .arg("-archivePath")
        .arg(paths.archive.display().to_string())
        .arg("-exportPath")
        .arg(paths.export_dir.display().to_string())
        .arg("-exportOptionsPlist")
        .arg(paths.export_options.display().to_string())
        .arg("-allowProvisioningUpdates")
        .current_dir(&config.project_root)
}

/// Export the archive, then move the package to its timestamped name
#[instrument(skip_all, fields(package = %paths.package.display()))]
pub fn run_export(
    config: &BuildConfiguration,
    paths: &ArtifactPaths,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> Result<ExportedPackage> {
    reporter.info("Exporting package...");

    reporter.info("Writing export options...");
    write_export_options(config, &paths.export_options)?;
    reporter.success(&format!(
        "Export options written: {}",
        paths.export_options.display()
    ));

    if !config.verbose {
        reporter.info("Exporting archive to package...");
    }

    // A package left by an earlier failed export must not pass for this one.
    if remove_tree(&paths.export_dir)? {
        debug!("removed stale export directory");
    }

    let invocation = export_invocation(config, paths);
    runner
        .run(&invocation, OutputMode::from_verbose(config.verbose))?
        .check(&invocation)?;

    if !paths.exported_package.is_file() {
        return Err(PackError::ArtifactMissing {
            stage: "export",
            expected_path: paths.exported_package.clone(),
        });
    }

    std::fs::rename(&paths.exported_package, &paths.package)?;
    let size_bytes = std::fs::metadata(&paths.package)?.len();
    let package = ExportedPackage {
        path: paths.package.clone(),
        size_bytes,
    };

    info!(size_bytes, "package exported");
    reporter.success(&format!("Package exported: {}", package.path.display()));
    reporter.info(&format!("Package size: {:.2} MB", package.size_mib()));
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, ProjectSettings};
    use crate::reporter::RecordingReporter;
    use crate::testing::{ScriptedRunner, Step};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> (BuildConfiguration, ArtifactPaths) {
        let config = BuildConfiguration::resolve(
            ProjectSettings::default(),
            Overrides::default(),
            temp.path(),
        )
        .unwrap();
        let ts = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let paths = ArtifactPaths::new(&config, ts);
        std::fs::create_dir_all(&paths.archive).unwrap();
        (config, paths)
    }

    #[test]
    fn test_export_arguments() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp);

        let inv = export_invocation(&config, &paths);

        assert_eq!(inv.args[0], "-exportArchive");
        assert_eq!(inv.flag_value("-archivePath"), paths.archive.to_str());
        assert_eq!(inv.flag_value("-exportPath"), paths.export_dir.to_str());
        assert_eq!(
            inv.flag_value("-exportOptionsPlist"),
            paths.export_options.to_str()
        );
        assert!(inv.has_arg("-allowProvisioningUpdates"));
    }

    #[test]
    fn test_export_relocates_package() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp);
        let payload = vec![0u8; 3 * 1024 * 1024 / 2];
        let runner = ScriptedRunner::new()
            .with_step(Step::ok().creates_file(&paths.exported_package, payload));
        let reporter = RecordingReporter::new();

        let package = run_export(&config, &paths, &runner, &reporter).unwrap();

        assert_eq!(package.path, paths.package);
        assert!(paths.package.is_file());
        assert!(!paths.exported_package.exists());
        assert!(paths.export_options.is_file());
        assert_eq!(package.size_bytes, 3 * 1024 * 1024 / 2);
        assert!((package.size_mib() - 1.5).abs() < f64::EPSILON);
        assert!(reporter.contains("Package size: 1.50 MB"));
    }

    #[test]
    fn test_export_missing_package_despite_success() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp);
        let runner = ScriptedRunner::new().with_step(Step::ok().creates_dir(&paths.export_dir));

        let err = run_export(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();
        assert!(matches!(err, PackError::ArtifactMissing { stage: "export", .. }));
        assert!(!paths.package.exists());
    }

    #[test]
    fn test_partial_package_from_earlier_export_is_discarded() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp);
        std::fs::create_dir_all(&paths.export_dir).unwrap();
        std::fs::write(&paths.exported_package, b"partial").unwrap();
        let runner = ScriptedRunner::new().with_step(Step::ok());

        let err = run_export(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();

        assert!(matches!(err, PackError::ArtifactMissing { stage: "export", .. }));
        assert!(!paths.exported_package.exists());
        assert!(!paths.package.exists());
    }

    #[test]
    fn test_export_failure_stops_before_relocation() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp);
        let runner = ScriptedRunner::new().with_step(
            Step::fail(70)
                .stderr("exportArchive: No signing certificate")
                .creates_file(&paths.exported_package, b"partial".to_vec()),
        );

        let err = run_export(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();
        assert!(matches!(err, PackError::CommandFailed { exit_code: Some(70), .. }));
        assert!(paths.exported_package.exists());
        assert!(!paths.package.exists());
    }
}
