use std::time::Duration;

use crate::{
    parse_recipe_from_url, try_parse_recipe_from_html, ExtractError, NormalizedRecipe,
    ParseOptions,
};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch the page from a URL
    Url(String),
    /// Use HTML that was already fetched
    Html { html: String, source_url: String },
}

/// Builder for configuring and executing a recipe extraction
#[derive(Debug, Default)]
pub struct RecipeExtractorBuilder {
    source: Option<InputSource>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl RecipeExtractorBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to pre-fetched HTML
    ///
    /// `source_url` is recorded on the extracted recipe; nothing is fetched.
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .html("<html>...</html>", "https://example.com/recipe");
    /// ```
    pub fn html(mut self, html: impl Into<String>, source_url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Html {
            html: html.into(),
            source_url: source_url.into(),
        });
        self
    }

    /// Set a timeout for the HTTP fetch
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(5));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the User-Agent header sent with the fetch
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            timeout_ms: self
                .timeout
                .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(defaults.timeout_ms),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    /// Build and execute the extraction
    ///
    /// # Errors
    /// Returns `ExtractError` if:
    /// - No input source was specified
    /// - The URL fetch fails
    /// - No usable recipe could be extracted (`NoRecipeFound`)
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeExtractor;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipe = RecipeExtractor::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<NormalizedRecipe, ExtractError> {
        let options = self.options();
        let source = self.source.ok_or_else(|| {
            ExtractError::BuilderError("No input source specified. Use .url() or .html()".to_string())
        })?;

        let recipe = match source {
            InputSource::Url(url) => parse_recipe_from_url(&url, &options).await?,
            InputSource::Html { html, source_url } => {
                try_parse_recipe_from_html(&html, &source_url)?
            }
        };

        recipe.ok_or(ExtractError::NoRecipeFound)
    }
}

/// Main entry point for the builder API
pub struct RecipeExtractor;

impl RecipeExtractor {
    /// Creates a new builder for extracting recipes
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder();
    /// ```
    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }
}
