pub mod html;
pub mod url;

use crate::error::ExtractError;
use crate::extractors::{DomExtractor, Extractor, JsonLdExtractor, ParsingContext};
use crate::model::NormalizedRecipe;
use log::{debug, info};

/// Extractors in the order they are tried: embedded structured data first,
/// then the markup heuristics.
fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![Box::new(JsonLdExtractor), Box::new(DomExtractor)]
}

/// Run each extractor against the page until one produces a recipe.
pub fn run_extractors(
    context: &ParsingContext,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    for extractor in default_extractors() {
        debug!("Trying {} extractor for {}", extractor.name(), context.url);
        if let Some(recipe) = extractor.parse(context)? {
            info!(
                "Extracted '{}' from {} using {} extractor",
                recipe.title,
                context.url,
                extractor.name()
            );
            return Ok(Some(recipe));
        }
    }

    info!("No recipe could be extracted from {}", context.url);
    Ok(None)
}
