use crate::error::ExtractError;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Options for the URL-driven entry points
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fetch timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Value of the User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "RecipeParser/1.0".to_string()
}

impl ParseOptions {
    /// [`load_config`] with the error folded into [`ExtractError`]
    pub fn load() -> Result<Self, ExtractError> {
        Ok(load_config()?)
    }
}

/// Load parse options from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_EXTRACT__ prefix
/// 2. recipe-extract.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_EXTRACT__TIMEOUT_MS
pub fn load_config() -> Result<ParseOptions, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("recipe-extract").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
