//! Environment validation
//!
//! Confirms the toolchain is installed, the project file exists and the scheme
//! is one the toolchain reports for it. Read-only apart from the scheme query.

use tracing::{debug, instrument};

use crate::config::BuildConfiguration;
use crate::error::{PackError, Result};
use crate::reporter::Reporter;
use crate::runner::{CommandRunner, Invocation, OutputMode};
use crate::stages::XCODEBUILD;

/// Run every environment check, failing on the first violation
#[instrument(skip_all, fields(scheme = %config.scheme))]
pub fn validate_environment(
    config: &BuildConfiguration,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info("Validating build environment...");

    for tool in &config.required_tools {
        match runner.resolve(tool) {
            Some(path) => debug!(tool = %tool, path = %path.display(), "tool resolved"),
            None => return Err(PackError::ToolNotFound { tool: tool.clone() }),
        }
    }

    if !config.project_path.exists() {
        return Err(PackError::ProjectNotFound {
            path: config.project_path.clone(),
        });
    }
    if let Some(workspace) = &config.workspace_path {
        if !workspace.exists() {
            return Err(PackError::ProjectNotFound {
                path: workspace.clone(),
            });
        }
    }

    let schemes = list_schemes(config, runner)?;
    if !schemes.iter().any(|s| s == &config.scheme) {
        return Err(PackError::SchemeNotFound {
            scheme: config.scheme.clone(),
            available: schemes,
        });
    }

    reporter.success("Environment validated");
    Ok(())
}

/// Ask the toolchain for the schemes of the configured project or workspace
pub fn list_schemes(config: &BuildConfiguration, runner: &dyn CommandRunner) -> Result<Vec<String>> {
    let invocation = Invocation::new(XCODEBUILD)
        .args(["-list", "-json"])
        .args(config.container().args())
        .current_dir(&config.project_root);

    // Always captured: the output is the answer.
    let output = runner
        .run(&invocation, OutputMode::Captured)?
        .check(&invocation)?;

    let schemes = parse_schemes(&output.stdout);
    debug!(count = schemes.len(), "schemes listed");
    Ok(schemes)
}

/// Extract scheme names from `xcodebuild -list` output, JSON or plain text
pub fn parse_schemes(stdout: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(stdout) {
        Ok(json) => {
            let schemes = json
                .get("workspace")
                .or_else(|| json.get("project"))
                .and_then(|c| c.get("schemes"))
                .and_then(|s| s.as_array());

            schemes
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default()
        }
        Err(_) => parse_schemes_text(stdout),
    }
}

fn parse_schemes_text(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip_while(|line| line.trim() != "Schemes:")
        .skip(1)
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
