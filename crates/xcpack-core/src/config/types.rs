//! Configuration types

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::defaults::*;
use super::validation::validate_settings;
use crate::error::Result;

/// Project settings as compiled in or read from `xcpack.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project name, used for the archive and package file names
    pub name: String,

    /// Scheme to archive
    pub scheme: String,

    /// Path to the `.xcodeproj`, relative to the project root
    pub project: PathBuf,

    /// Path to a `.xcworkspace`; when set, the toolchain is pointed at it instead of the project
    pub workspace: Option<PathBuf>,

    /// Bundle identifier used for the provisioning profile mapping
    pub bundle_id: String,

    /// Build configuration name (e.g., "Release")
    pub configuration: String,

    /// Export method written to the export options
    pub export_method: ExportMethod,

    /// Developer team identifier
    pub team_id: String,

    /// Target SDK identifier
    pub sdk: String,

    /// Archive destination specifier
    pub destination: String,

    /// Build output directory, relative to the project root
    pub build_dir: PathBuf,

    /// Commands that must be on PATH
    pub required_tools: Vec<String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            project: PathBuf::from(DEFAULT_PROJECT_PATH),
            workspace: None,
            bundle_id: DEFAULT_BUNDLE_ID.to_string(),
            configuration: DEFAULT_CONFIGURATION.to_string(),
            export_method: ExportMethod::default(),
            team_id: DEFAULT_TEAM_ID.to_string(),
            sdk: DEFAULT_SDK.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            required_tools: DEFAULT_REQUIRED_TOOLS
                .iter()
                .map(|tool| tool.to_string())
                .collect(),
        }
    }
}

/// How the archive is exported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMethod {
    /// App Store distribution
    #[default]
    AppStore,
    /// Ad-hoc distribution to registered devices
    AdHoc,
    /// In-house enterprise distribution
    Enterprise,
    /// Development-signed build
    Development,
}

impl ExportMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppStore => "app-store",
            Self::AdHoc => "ad-hoc",
            Self::Enterprise => "enterprise",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for ExportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code signing style, derived from the presence of a provisioning profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStyle {
    Automatic,
    Manual,
}

impl SigningStyle {
    /// Lowercase form used in the export options
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }

    /// Capitalized form expected by the `CODE_SIGN_STYLE` build setting
    pub fn build_setting(&self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Manual => "Manual",
        }
    }
}

impl fmt::Display for SigningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub team_id: Option<String>,
    pub provisioning_profile: Option<String>,
    pub verbose: bool,
}

/// Project container the toolchain operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XcodeContainer<'a> {
    Project(&'a Path),
    Workspace(&'a Path),
}

impl XcodeContainer<'_> {
    /// `-project <path>` or `-workspace <path>`
    pub fn args(&self) -> [String; 2] {
        match self {
            Self::Project(path) => ["-project".to_string(), path.display().to_string()],
            Self::Workspace(path) => ["-workspace".to_string(), path.display().to_string()],
        }
    }
}

/// Fully resolved, immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub project_name: String,
    pub scheme: String,
    pub bundle_id: String,
    pub project_root: PathBuf,
    pub project_path: PathBuf,
    pub workspace_path: Option<PathBuf>,
    pub build_dir: PathBuf,
    pub configuration: String,
    pub export_method: ExportMethod,
    pub team_id: String,
    pub provisioning_profile: Option<String>,
    pub sdk: String,
    pub destination: String,
    pub required_tools: Vec<String>,
    pub verbose: bool,
}

impl BuildConfiguration {
    /// Overlay overrides on validated settings and resolve paths against the project root
    pub fn resolve(
        settings: ProjectSettings,
        overrides: Overrides,
        project_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        validate_settings(&settings)?;

        let project_root = project_root.into();
        let team_id = non_empty(overrides.team_id).unwrap_or(settings.team_id);
        let provisioning_profile = non_empty(overrides.provisioning_profile);

        Ok(Self {
            project_path: project_root.join(&settings.project),
            workspace_path: settings.workspace.map(|ws| project_root.join(ws)),
            build_dir: project_root.join(&settings.build_dir),
            project_root,
            project_name: settings.name,
            scheme: settings.scheme,
            bundle_id: settings.bundle_id,
            configuration: settings.configuration,
            export_method: settings.export_method,
            team_id,
            provisioning_profile,
            sdk: settings.sdk,
            destination: settings.destination,
            required_tools: settings.required_tools,
            verbose: overrides.verbose,
        })
    }

    /// Manual when a named provisioning profile was supplied, automatic otherwise
    pub fn signing_style(&self) -> SigningStyle {
        if self.provisioning_profile.is_some() {
            SigningStyle::Manual
        } else {
            SigningStyle::Automatic
        }
    }

    /// The workspace when one is configured, otherwise the project
    pub fn container(&self) -> XcodeContainer<'_> {
        match &self.workspace_path {
            Some(ws) => XcodeContainer::Workspace(ws),
            None => XcodeContainer::Project(&self.project_path),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
