use super::run_extractors;
use crate::config::ParseOptions;
use crate::error::ExtractError;
use crate::extractors::ParsingContext;
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::model::NormalizedRecipe;

/// Fetch `url` and extract its recipe.
///
/// Fetch failures (network, timeout, non-2xx status) are returned as
/// [`ExtractError::FetchError`]; a page without a usable recipe is `Ok(None)`.
pub async fn parse_recipe_from_url(
    url: &str,
    options: &ParseOptions,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    let fetcher = RequestFetcher::new(options)?;
    parse_recipe_from_url_with(&fetcher, url).await
}

/// Like [`parse_recipe_from_url`], with a caller-supplied fetcher.
pub async fn parse_recipe_from_url_with(
    fetcher: &dyn Fetcher,
    url: &str,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    let html = fetcher.fetch(url).await?;

    // `Html` is not `Send`; it is only built after the last await.
    let context = ParsingContext::new(url, &html);
    run_extractors(&context)
}
