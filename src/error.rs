use thiserror::Error;

/// Errors that can occur during recipe extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to fetch the page (network, timeout or non-2xx status)
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// A selector from the catalog could not be compiled
    #[error("Invalid selector `{0}`")]
    SelectorError(String),

    /// The page was parsed but no usable recipe could be assembled
    #[error("No usable recipe could be extracted from this page")]
    NoRecipeFound,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
