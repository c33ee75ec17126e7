//! Archive stage

use tracing::{debug, info, instrument};

use crate::config::BuildConfiguration;
use crate::error::{PackError, Result};
use crate::paths::ArtifactPaths;
use crate::reporter::Reporter;
use crate::runner::{CommandRunner, Invocation, OutputMode};
use crate::workspace::remove_tree;

use super::XCODEBUILD;

/// Command line for `xcodebuild archive`
pub fn archive_invocation(config: &BuildConfiguration, paths: &ArtifactPaths) -> Invocation {
    let style = config.signing_style();

    let mut invocation = Invocation::new(XCODEBUILD)
        .arg("archive")
        .args(["-scheme", config.scheme.as_str()])
        .args(["-configuration", config.configuration.as_str()])
        .args(["-sdk", config.sdk.as_str()])
        .arg("-archivePath")
        .arg(paths.archive.display().to_string())
        .args(["-destination", config.destination.as_str()])
        .arg("-allowProvisioningUpdates")
        .arg(format!("DEVELOPMENT_TEAM={}", config.team_id))
        .arg(format!("CODE_SIGN_STYLE={}", style.build_setting()));

    if let Some(profile) = &config.provisioning_profile {
        invocation = invocation.arg(format!("PROVISIONING_PROFILE_SPECIFIER={}", profile));
    }

    invocation
        .args(config.container().args())
        .current_dir(&config.project_root)
}

/// Archive the scheme and confirm the archive exists
#[instrument(skip_all, fields(archive = %paths.archive.display()))]
pub fn run_archive(
    config: &BuildConfiguration,
    paths: &ArtifactPaths,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info("Building archive...");
    if !config.verbose {
        reporter.info("Compiling project (this may take several minutes)...");
    }

    // Only an archive written by this invocation may satisfy the check below.
    if remove_tree(&paths.archive)? {
        debug!("removed stale archive");
    }

    let invocation = archive_invocation(config, paths);
    runner
        .run(&invocation, OutputMode::from_verbose(config.verbose))?
        .check(&invocation)?;

    if !paths.archive.exists() {
        return Err(PackError::ArtifactMissing {
            stage: "archive",
            expected_path: paths.archive.clone(),
        });
    }

    info!("archive created");
    reporter.success(&format!("Archive created: {}", paths.archive.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, ProjectSettings};
    use crate::reporter::RecordingReporter;
    use crate::testing::{ScriptedRunner, Step};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup(temp: &TempDir, overrides: Overrides) -> (BuildConfiguration, ArtifactPaths) {
        let config =
            BuildConfiguration::resolve(ProjectSettings::default(), overrides, temp.path()).unwrap();
        let ts = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let paths = ArtifactPaths::new(&config, ts);
        (config, paths)
    }

    #[test]
    fn test_archive_arguments() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp, Overrides::default());

        let inv = archive_invocation(&config, &paths);

        assert_eq!(inv.program, "xcodebuild");
        assert_eq!(inv.args[0], "archive");
        assert_eq!(inv.flag_value("-scheme"), Some("MyStory"));
        assert_eq!(inv.flag_value("-configuration"), Some("Release"));
        assert_eq!(inv.flag_value("-sdk"), Some("iphoneos"));
        assert_eq!(inv.flag_value("-destination"), Some("generic/platform=iOS"));
        assert_eq!(
            inv.flag_value("-archivePath"),
            Some(paths.archive.to_str().unwrap())
        );
        assert!(inv.has_arg("-allowProvisioningUpdates"));
        assert!(inv.has_arg("DEVELOPMENT_TEAM=HY652QKG7G"));
        assert!(inv.has_arg("CODE_SIGN_STYLE=Automatic"));
        assert!(!inv.args.iter().any(|a| a.starts_with("PROVISIONING_PROFILE_SPECIFIER")));
        assert_eq!(
            inv.flag_value("-project"),
            Some(config.project_path.to_str().unwrap())
        );
    }

    #[test]
    fn test_archive_manual_signing_arguments() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(
            &temp,
            Overrides {
                team_id: Some("ABCDE12345".to_string()),
                provisioning_profile: Some("MyProfile".to_string()),
                verbose: false,
            },
        );

        let inv = archive_invocation(&config, &paths);

        assert!(inv.has_arg("DEVELOPMENT_TEAM=ABCDE12345"));
        assert!(inv.has_arg("CODE_SIGN_STYLE=Manual"));
        assert!(inv.has_arg("PROVISIONING_PROFILE_SPECIFIER=MyProfile"));
    }

    #[test]
    fn test_archive_success() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp, Overrides::default());
        let runner = ScriptedRunner::new().with_step(Step::ok().creates_dir(&paths.archive));
        let reporter = RecordingReporter::new();

        run_archive(&config, &paths, &runner, &reporter).unwrap();

        assert_eq!(runner.calls()[0].1, OutputMode::Captured);
        assert!(reporter.contains("Archive created"));
    }

    #[test]
    fn test_archive_missing_despite_success() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp, Overrides::default());
        let runner = ScriptedRunner::new().with_step(Step::ok());

        let err = run_archive(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();
        assert!(matches!(err, PackError::ArtifactMissing { stage: "archive", .. }));
    }

    #[test]
    fn test_stale_archive_does_not_satisfy_check() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp, Overrides::default());
        std::fs::create_dir_all(paths.archive.join("Products")).unwrap();
        let runner = ScriptedRunner::new().with_step(Step::ok());

        let err = run_archive(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();

        assert!(matches!(err, PackError::ArtifactMissing { stage: "archive", .. }));
        assert!(!paths.archive.exists());
    }

    #[test]
    fn test_archive_failure_surfaces_stderr() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(&temp, Overrides::default());
        let runner = ScriptedRunner::new()
            .with_step(Step::fail(65).stderr("error: No profiles for 'com.lgogo.story'"));

        let err = run_archive(&config, &paths, &runner, &RecordingReporter::new()).unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert_eq!(
            err.captured_stderr(),
            Some("error: No profiles for 'com.lgogo.story'")
        );
    }

    #[test]
    fn test_verbose_streams_output() {
        let temp = TempDir::new().unwrap();
        let (config, paths) = setup(
            &temp,
            Overrides {
                verbose: true,
                ..Default::default()
            },
        );
        let runner = ScriptedRunner::new().with_step(Step::fail(65).stderr("hidden"));
        let reporter = RecordingReporter::new();

        let err = run_archive(&config, &paths, &runner, &reporter).unwrap_err();

        assert_eq!(runner.calls()[0].1, OutputMode::Streamed);
        assert_eq!(err.captured_stderr(), None);
        assert!(!reporter.contains("several minutes"));
    }
}
