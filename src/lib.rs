//! Recipe extraction from arbitrary recipe web pages.
//!
//! Embedded schema.org JSON-LD is tried first; pages without usable
//! structured data fall back to markup heuristics. Either way the result is a
//! [`NormalizedRecipe`].

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod ingredient;
pub mod model;
pub mod pipelines;
pub mod selectors;
pub mod text;

pub use builder::{InputSource, RecipeExtractor, RecipeExtractorBuilder};
pub use config::{load_config, ParseOptions};
pub use error::ExtractError;
pub use extractors::{extract_from_document, extract_from_markup, map_to_normalized_recipe};
pub use fetchers::{Fetcher, RequestFetcher};
pub use model::{Ingredient, NormalizedRecipe, Step};
pub use pipelines::html::{parse_recipe_from_html, try_parse_recipe_from_html};
pub use pipelines::url::{parse_recipe_from_url, parse_recipe_from_url_with};
