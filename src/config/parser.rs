use crate::config::types::ConfigFile;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file only supplies defaults; validation happens once the start URL
/// and any command-line overrides are known.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ConfigFile)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_auditor::config::load_config;
///
/// let file = load_config(Path::new("auditor.toml")).unwrap();
/// let config = file.audit_config("https://example.com/");
/// println!("Max depth: {}", config.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration file content
pub fn parse_config(content: &str) -> Result<ConfigFile, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;
    Ok(file)
}
