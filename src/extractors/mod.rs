use crate::error::ExtractError;
use crate::model::NormalizedRecipe;
use scraper::Html;

mod dom;
mod json_ld;

pub use dom::{extract_from_markup, DomExtractor};
pub use json_ld::{
    extract_from_document, extract_structured_recipes, map_to_normalized_recipe,
    JsonLdExtractor, StructuredRecipe,
};

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the page did not yield a usable recipe this way.
    fn parse(&self, context: &ParsingContext) -> Result<Option<NormalizedRecipe>, ExtractError>;
}
