//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::ProjectSettings;

/// Validate project settings
pub fn validate_settings(settings: &ProjectSettings) -> Result<()> {
    debug!("validating project settings");

    let required = [
        ("name", &settings.name),
        ("scheme", &settings.scheme),
        ("bundle_id", &settings.bundle_id),
        ("configuration", &settings.configuration),
        ("team_id", &settings.team_id),
        ("sdk", &settings.sdk),
        ("destination", &settings.destination),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(invalid(field, "cannot be empty"));
        }
    }

    if settings.project.as_os_str().is_empty() {
        return Err(invalid("project", "cannot be empty"));
    }

    if settings.build_dir.as_os_str().is_empty() {
        return Err(invalid("build_dir", "cannot be empty"));
    }

    if settings.name.contains(std::path::is_separator) {
        return Err(invalid("name", "must not contain path separators"));
    }

    if settings.required_tools.iter().any(|t| t.trim().is_empty()) {
        return Err(invalid("required_tools", "tool names cannot be empty"));
    }

    debug!("project settings validation passed");
    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::PackError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
