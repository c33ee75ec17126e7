//! ExportOptions.plist rendering
//!
//! The document is a pure function of the configuration: fixed keys for the
//! export method, team, bitcode and symbols, plus a provisioning profile
//! mapping only when a named profile was supplied.

use std::path::Path;

use plist::{Dictionary, Value};
use tracing::debug;

use crate::config::BuildConfiguration;
use crate::error::{PackError, Result};

/// Build the options dictionary
pub fn export_options(config: &BuildConfiguration) -> Dictionary {
    let mut options = Dictionary::new();
    options.insert(
        "method".to_string(),
        Value::String(config.export_method.as_str().to_string()),
    );
    options.insert("teamID".to_string(), Value::String(config.team_id.clone()));
    options.insert("uploadBitcode".to_string(), Value::Boolean(false));
    options.insert("uploadSymbols".to_string(), Value::Boolean(true));
    options.insert("compileBitcode".to_string(), Value::Boolean(false));
    options.insert(
        "signingStyle".to_string(),
        Value::String(config.signing_style().as_str().to_string()),
    );

    if let Some(profile) = &config.provisioning_profile {
        let mut profiles = Dictionary::new();
        profiles.insert(config.bundle_id.clone(), Value::String(profile.clone()));
        options.insert(
            "provisioningProfiles".to_string(),
            Value::Dictionary(profiles),
        );
    }

    options
}

/// Render the options as an XML property list
pub fn render(config: &BuildConfiguration) -> Result<String> {
    let mut buf = Vec::new();
    plist::to_writer_xml(&mut buf, &Value::Dictionary(export_options(config)))
        .map_err(|e| PackError::Render(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| PackError::Render(e.to_string()))
}

/// Render and write to `path`, replacing any previous file
pub fn write_export_options(config: &BuildConfiguration, path: &Path) -> Result<()> {
    let text = render(config)?;
    std::fs::write(path, text)?;
    debug!(path = %path.display(), "export options written");
    Ok(())
}
