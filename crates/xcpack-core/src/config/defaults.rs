//! Compiled-in defaults

/// Project name, also the stem of the archive and package file names
pub const DEFAULT_PROJECT_NAME: &str = "MyStory";

/// Scheme to archive
pub const DEFAULT_SCHEME: &str = "MyStory";

/// Project file, relative to the project root
pub const DEFAULT_PROJECT_PATH: &str = "MyStory.xcodeproj";

/// Bundle identifier of the Release configuration
pub const DEFAULT_BUNDLE_ID: &str = "com.lgogo.story";

/// Build configuration name
pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Developer team identifier
pub const DEFAULT_TEAM_ID: &str = "HY652QKG7G";

/// SDK passed to the archive operation
pub const DEFAULT_SDK: &str = "iphoneos";

/// Destination passed to the archive operation
pub const DEFAULT_DESTINATION: &str = "generic/platform=iOS";

/// Build output directory, relative to the project root
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Tools that must resolve on PATH before anything runs
pub const DEFAULT_REQUIRED_TOOLS: &[&str] = &["xcodebuild", "xcrun"];

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "xcpack.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "xcpack.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".xcpack.toml",
        ".xcpack.yaml",
    ]
}
