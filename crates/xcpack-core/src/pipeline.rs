//! Pipeline controller
//!
//! Runs `[clean] → validate → archive → export → cleanup` in order. Any
//! failure aborts the run; artifacts already produced are left in place.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument};

use crate::config::{BuildConfiguration, ExportMethod};
use crate::error::{PackError, Result};
use crate::paths::ArtifactPaths;
use crate::reporter::Reporter;
use crate::runner::CommandRunner;
use crate::stages::{run_archive, run_export, ExportedPackage};
use crate::validate::validate_environment;
use crate::workspace::{remove_tree, Workspace};

const RULE: &str = "==================================================";

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Validate,
    Archive,
    Export,
    Cleanup,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Validate => "validate",
            Self::Archive => "archive",
            Self::Export => "export",
            Self::Cleanup => "cleanup",
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub package: ExportedPackage,
    pub duration: Duration,
}

/// Sequences the stages for one configuration
pub struct Pipeline<'a> {
    config: &'a BuildConfiguration,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    clean: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a BuildConfiguration,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            runner,
            reporter,
            clean: false,
        }
    }

    /// Remove the build directory before validating
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Run with the current local time as the package timestamp
    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now().naive_local())
    }

    /// Run with an explicit package timestamp
    #[instrument(skip(self), fields(project = %self.config.project_name, clean = self.clean))]
    pub fn run_at(&self, timestamp: NaiveDateTime) -> Result<RunSummary> {
        let config = self.config;
        let reporter = self.reporter;

        reporter.info("Starting archive and export...");
        reporter.blank();
        self.report_configuration();
        reporter.blank();

        let workspace = Workspace::new(&config.build_dir);

        if self.clean {
            enter(Stage::Clean);
            reporter.info("Cleaning build directory...");
            if workspace.clean()? {
                reporter.success("Build directory cleaned");
            } else {
                reporter.info("Build directory already clean");
            }
            reporter.blank();
        }

        enter(Stage::Validate);
        validate_environment(config, self.runner, reporter)?;
        reporter.blank();

        let start = Instant::now();
        let paths = ArtifactPaths::new(config, timestamp);
        if paths.package.exists() {
            return Err(PackError::PackageExists {
                path: paths.package.clone(),
            });
        }
        workspace.ensure()?;

        enter(Stage::Archive);
        run_archive(config, &paths, self.runner, reporter)?;
        reporter.blank();

        enter(Stage::Export);
        let package = run_export(config, &paths, self.runner, reporter)?;
        reporter.blank();

        enter(Stage::Cleanup);
        remove_tree(&paths.export_dir)?;

        let summary = RunSummary {
            package,
            duration: start.elapsed(),
        };
        info!(
            package = %summary.package.path.display(),
            size_bytes = summary.package.size_bytes,
            duration_ms = summary.duration.as_millis() as u64,
            "pipeline completed"
        );
        self.report_summary(&summary);
        Ok(summary)
    }

    fn report_configuration(&self) {
        let config = self.config;
        let reporter = self.reporter;

        reporter.info(RULE);
        reporter.info("Build configuration");
        reporter.info(RULE);
        reporter.info(&format!("Project:        {}", config.project_name));
        reporter.info(&format!("Scheme:         {}", config.scheme));
        reporter.info(&format!("Configuration:  {}", config.configuration));
        reporter.info(&format!("Bundle ID:      {}", config.bundle_id));
        reporter.info(&format!("Export method:  {}", config.export_method));
        reporter.info(&format!("Team ID:        {}", config.team_id));
        reporter.info(&format!("Signing style:  {}", config.signing_style()));
        if let Some(profile) = &config.provisioning_profile {
            reporter.info(&format!("Profile:        {}", profile));
        }
        reporter.info(&format!("Output dir:     {}", config.build_dir.display()));
        reporter.info(RULE);
    }

    fn report_summary(&self, summary: &RunSummary) {
        let reporter = self.reporter;
        let path = summary.package.path.display();

        reporter.success(RULE);
        reporter.success("Build complete!");
        reporter.success(RULE);
        reporter.success(&format!("Package:  {}", path));
        reporter.success(&format!("Size:     {:.2} MB", summary.package.size_mib()));
        reporter.success(&format!("Elapsed:  {}", format_duration(summary.duration)));
        reporter.success(RULE);

        if self.config.export_method == ExportMethod::AppStore {
            reporter.blank();
            reporter.info("Next steps:");
            reporter.info("1. Upload the package to App Store Connect with the Transporter app");
            reporter.info(&format!(
                "2. Or run: xcrun altool --upload-app --file \"{}\" --type ios --username YOUR_APPLE_ID --password YOUR_APP_SPECIFIC_PASSWORD",
                path
            ));
        }
    }
}

fn enter(stage: Stage) {
    info!(stage = stage.as_str(), "entering stage");
}

/// `Xm Ys`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
