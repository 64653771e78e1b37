use crate::config::schema::DirectoryConfig;
use crate::error::AchdirError;

const DEFAULT_CONFIG_JSON: &str = include_str!("../../../../config/default.json");

/// The embedded default configuration as JSON text.
pub fn default_config_json() -> &'static str {
    DEFAULT_CONFIG_JSON
}

/// Load the embedded default configuration.
pub fn default_config() -> Result<DirectoryConfig, AchdirError> {
    super::parse_config_str(DEFAULT_CONFIG_JSON)
}
