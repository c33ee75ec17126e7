//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::ProjectSettings;
use super::validation::validate_settings;

/// Load project settings from a file
pub fn load_settings(path: &Path) -> Result<ProjectSettings> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let settings: ProjectSettings = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_settings(&settings)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(settings)
}

/// Find configuration file in directory or parent directories.
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load settings from an explicit file, a discovered file, or the compiled-in defaults.
///
/// A discovered file that fails to parse is an error, not a silent fallback.
pub fn load_settings_or_default(
    dir: &Path,
    explicit: Option<&Path>,
) -> Result<(ProjectSettings, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_settings(path)?, Some(path.to_path_buf())));
    }

    match find_config(dir) {
        Some(path) => Ok((load_settings(&path)?, Some(path))),
        None => {
            debug!(dir = %dir.display(), "no config found, using compiled-in defaults");
            Ok((ProjectSettings::default(), None))
        }
    }
}
