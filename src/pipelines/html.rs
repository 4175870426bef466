use super::run_extractors;
use crate::error::ExtractError;
use crate::extractors::ParsingContext;
use crate::model::NormalizedRecipe;
use log::warn;

/// Extract a recipe from HTML that is already in hand, propagating internal
/// errors.
pub fn try_parse_recipe_from_html(
    html: &str,
    source_url: &str,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    let context = ParsingContext::new(source_url, html);
    run_extractors(&context)
}

/// Extract a recipe from HTML that is already in hand.
///
/// Internal errors are logged and reported as `None`, so callers only need to
/// handle "no recipe".
pub fn parse_recipe_from_html(html: &str, source_url: &str) -> Option<NormalizedRecipe> {
    match try_parse_recipe_from_html(html, source_url) {
        Ok(recipe) => recipe,
        Err(e) => {
            warn!("Error parsing recipe from HTML for {}: {}", source_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_without_recipe_is_none() {
        let html = "<html><head><title>About us</title></head><body><p>Hello</p></body></html>";
        assert!(parse_recipe_from_html(html, "https://example.com/about").is_none());
        assert!(try_parse_recipe_from_html(html, "https://example.com/about")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_structured_data_falls_through_to_markup() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Broken", "recipeInstructions": ["Stir"]}</script>
            </head><body>
            <h1 class="recipe-title">Garlic Bread</h1>
            <ul class="ingredients"><li>1 baguette</li><li>3 cloves garlic, minced</li></ul>
            <ol class="instructions"><li>Spread garlic butter on the bread.</li><li>Bake until crisp.</li></ol>
            </body></html>"#;

        let recipe = parse_recipe_from_html(html, "https://example.com/bread").unwrap();
        assert_eq!(recipe.title, "Garlic Bread");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.steps.len(), 2);
    }
}
