//! CLI definition and command handling

pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use xcpack_core::config::load_settings_or_default;
use xcpack_core::interrupt::{ctrl_c, run_interruptible};
use xcpack_core::{BuildConfiguration, Overrides, PackError, Pipeline, Reporter, SystemRunner};

use crate::exit_codes;
use output::ConsoleReporter;

const EXAMPLES: &str = "\
Examples:
  xcpack                      Build with the default configuration
  xcpack --clean              Clean the build directory, then build
  xcpack -t HY652QKG7G        Build for a specific team
  xcpack -p \"MyStory AppStore\" Sign manually with a named profile
  xcpack -v                   Stream the full xcodebuild log";

/// xcpack - archive and export an Xcode project as an App Store package
#[derive(Debug, Parser)]
#[command(name = "xcpack")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Clean the build directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Developer team ID (overrides the configured one)
    #[arg(short, long, env = "XCPACK_TEAM_ID", value_name = "ID")]
    pub team_id: Option<String>,

    /// Provisioning profile name; switches signing to manual
    #[arg(short, long, env = "XCPACK_PROVISIONING_PROFILE", value_name = "NAME")]
    pub provisioning_profile: Option<String>,

    /// Stream xcodebuild output instead of capturing it
    #[arg(short, long)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file, skipping discovery
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Run the pipeline and return the process exit code
    pub fn execute(self) -> anyhow::Result<i32> {
        let reporter = ConsoleReporter;
        let verbose = self.verbose;

        match self.run(reporter) {
            Ok(Ok(())) => Ok(exit_codes::SUCCESS),
            Ok(Err(e)) => {
                report_failure(&reporter, &e, verbose);
                Ok(e.exit_code())
            }
            Err(e) => Err(e),
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            team_id: self.team_id.clone(),
            provisioning_profile: self.provisioning_profile.clone(),
            verbose: self.verbose,
        }
    }

    fn project_root(&self) -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.directory {
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }

    /// Outer error: the CLI itself could not run. Inner error: the build failed.
    fn run(self, reporter: ConsoleReporter) -> anyhow::Result<xcpack_core::Result<()>> {
        let root = self.project_root()?;

        let (settings, config_path) =
            match load_settings_or_default(&root, self.config.as_deref()) {
                Ok(loaded) => loaded,
                Err(e) => return Ok(Err(e)),
            };
        if let Some(path) = &config_path {
            info!(path = %path.display(), "using config file");
        }

        let config = match BuildConfiguration::resolve(settings, self.overrides(), root) {
            Ok(config) => config,
            Err(e) => return Ok(Err(e)),
        };
        let clean = self.clean;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let result = runtime.block_on(run_interruptible(
            move || {
                Pipeline::new(&config, &SystemRunner, &reporter)
                    .with_clean(clean)
                    .run()
                    .map(|_| ())
            },
            ctrl_c(),
        ));

        // An interrupted pipeline thread may still be blocked on a child.
        runtime.shutdown_background();
        Ok(result)
    }
}

fn report_failure(reporter: &dyn Reporter, error: &PackError, verbose: bool) {
    if matches!(error, PackError::Interrupted) {
        reporter.blank();
        reporter.warning("Build interrupted by user");
        return;
    }

    reporter.error(&format!("Build failed: {error}"));
    if let Some(stderr) = error.captured_stderr() {
        reporter.error(stderr.trim_end());
    }

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            reporter.error(&format!("  caused by: {cause}"));
            source = std::error::Error::source(cause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use xcpack_core::{Level, RecordingReporter};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["xcpack"]).unwrap();

        assert!(!cli.clean);
        assert!(!cli.verbose);
        assert!(cli.directory.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "xcpack", "-c", "-t", "ABCDE12345", "-p", "MyProfile", "-v", "-C", "ios",
        ])
        .unwrap();

        assert!(cli.clean);
        assert!(cli.verbose);
        assert_eq!(cli.team_id.as_deref(), Some("ABCDE12345"));
        assert_eq!(cli.provisioning_profile.as_deref(), Some("MyProfile"));
        assert_eq!(cli.directory, Some(PathBuf::from("ios")));

        let overrides = cli.overrides();
        assert_eq!(overrides.team_id.as_deref(), Some("ABCDE12345"));
        assert!(overrides.verbose);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "xcpack",
            "--clean",
            "--team-id",
            "ABCDE12345",
            "--provisioning-profile",
            "MyProfile",
            "--verbose",
            "--config",
            "ci/xcpack.toml",
        ])
        .unwrap();

        assert!(cli.clean);
        assert_eq!(cli.config, Some(PathBuf::from("ci/xcpack.toml")));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["xcpack", "--upload"]).is_err());
    }

    #[test]
    fn test_failure_report_includes_captured_stderr() {
        let reporter = RecordingReporter::new();
        let error = PackError::CommandFailed {
            command: "xcodebuild archive".to_string(),
            exit_code: Some(65),
            stderr: "error: Signing requires a development team\n".to_string(),
        };

        report_failure(&reporter, &error, false);

        assert_eq!(
            reporter.at(Level::Error),
            vec![
                "Build failed: Command failed: xcodebuild archive".to_string(),
                "error: Signing requires a development team".to_string(),
            ]
        );
    }

    #[test]
    fn test_interrupt_is_a_warning() {
        let reporter = RecordingReporter::new();

        report_failure(&reporter, &PackError::Interrupted, false);

        assert!(reporter.at(Level::Error).is_empty());
        assert_eq!(
            reporter.at(Level::Warning),
            vec!["Build interrupted by user".to_string()]
        );
    }

    #[test]
    fn test_verbose_failure_lists_causes() {
        let reporter = RecordingReporter::new();
        let error = PackError::workspace(
            "/work/build",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"),
        );

        report_failure(&reporter, &error, true);

        assert!(reporter.contains("caused by: read-only volume"));
    }
}
