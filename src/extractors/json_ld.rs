use super::{Extractor, ParsingContext};
use crate::duration::reconcile_times;
use crate::error::ExtractError;
use crate::ingredient::parse_ingredient_lines;
use crate::model::{number_steps, NormalizedRecipe};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

static INSTRUCTION_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+|\n+").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

pub struct JsonLdExtractor;

/// A schema.org `Recipe` object found in a JSON-LD block.
///
/// Every field is optional and lenient: a field whose value has an
/// unrecognized shape is treated as absent instead of rejecting the object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredRecipe {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<Description>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
    #[serde(rename = "prepTime", default, deserialize_with = "lenient")]
    pub prep_time: Option<String>,
    #[serde(rename = "cookTime", default, deserialize_with = "lenient")]
    pub cook_time: Option<String>,
    #[serde(rename = "totalTime", default, deserialize_with = "lenient")]
    pub total_time: Option<String>,
    #[serde(rename = "recipeYield", default, deserialize_with = "lenient")]
    pub recipe_yield: Option<YieldField>,
    #[serde(rename = "recipeIngredient", default, deserialize_with = "lenient")]
    pub recipe_ingredient: Option<IngredientField>,
    #[serde(rename = "recipeInstructions", default, deserialize_with = "lenient")]
    pub recipe_instructions: Option<InstructionsField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Object { text: String },
}

impl Description {
    fn text(&self) -> &str {
        match self {
            Description::Text(text) | Description::Object { text } => text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageObject {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    Object(ImageObject),
    List(Vec<ImageField>),
}

impl ImageField {
    /// First usable URL, looking one level into lists
    pub fn url(&self) -> Option<String> {
        match self {
            ImageField::Url(url) => non_empty(url),
            ImageField::Object(image) => image.url.as_deref().and_then(non_empty),
            ImageField::List(images) => match images.first()? {
                ImageField::Url(url) => non_empty(url),
                ImageField::Object(image) => image.url.as_deref().and_then(non_empty),
                ImageField::List(_) => None,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorObject {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Object(AuthorObject),
    Multiple(Vec<AuthorObject>),
}

impl Author {
    pub fn display_name(&self) -> Option<String> {
        match self {
            Author::Name(name) => non_empty(name),
            Author::Object(author) => author.name.as_deref().and_then(non_empty),
            Author::Multiple(authors) => {
                let names: Vec<&str> = authors
                    .iter()
                    .filter_map(|author| author.name.as_deref())
                    .filter(|name| !name.trim().is_empty())
                    .collect();
                non_empty(&names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YieldField {
    Count(serde_json::Number),
    Text(String),
    List(Vec<YieldField>),
}

impl YieldField {
    pub fn servings(&self) -> Option<u32> {
        match self {
            YieldField::Count(number) => number
                .as_u64()
                .and_then(|count| u32::try_from(count).ok())
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|count| count.is_finite() && *count >= 1.0 && *count <= u32::MAX as f64)
                        .map(|count| count as u32)
                })
                .filter(|count| *count > 0),
            YieldField::Text(text) => DIGITS_RE
                .find(text)
                .and_then(|digits| digits.as_str().parse::<u32>().ok())
                .filter(|count| *count > 0),
            YieldField::List(yields) => yields.first()?.servings(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientField {
    Lines(Vec<Value>),
    Text(String),
}

impl IngredientField {
    /// Raw ingredient lines; non-string array entries are skipped
    pub fn lines(&self) -> Vec<&str> {
        match self {
            IngredientField::Lines(values) => values.iter().filter_map(Value::as_str).collect(),
            IngredientField::Text(text) => text.lines().collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HowToSection {
    #[serde(rename = "itemListElement")]
    pub item_list_element: Vec<InstructionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HowToStep {
    pub text: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InstructionItem {
    Text(String),
    Section(HowToSection),
    Step(HowToStep),
    Other(Value),
}

impl InstructionItem {
    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            InstructionItem::Text(text) => out.push(text.trim().to_string()),
            InstructionItem::Section(section) => {
                for item in &section.item_list_element {
                    item.collect_into(out);
                }
            }
            InstructionItem::Step(step) => {
                // Prefer text over name
                let text = step
                    .text
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .or(step.name.as_deref())
                    .unwrap_or_default();
                out.push(text.trim().to_string());
            }
            InstructionItem::Other(_) => {}
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InstructionsField {
    Text(String),
    Items(Vec<InstructionItem>),
}

impl InstructionsField {
    /// Instruction strings in order, blank entries removed
    pub fn instructions(&self) -> Vec<String> {
        let mut instructions = Vec::new();
        match self {
            InstructionsField::Text(text) => {
                instructions.extend(
                    INSTRUCTION_BREAK_RE
                        .split(text)
                        .map(|piece| piece.trim().to_string()),
                );
            }
            InstructionsField::Items(items) => {
                for item in items {
                    item.collect_into(&mut instructions);
                }
            }
        }
        instructions.retain(|instruction| !instruction.is_empty());
        instructions
    }
}

/// How a JSON-LD object declares its `@type`
enum SchemaType<'a> {
    Single(&'a str),
    List(&'a [Value]),
    Unknown,
}

impl<'a> From<Option<&'a Value>> for SchemaType<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(name)) => SchemaType::Single(name),
            Some(Value::Array(names)) => SchemaType::List(names),
            _ => SchemaType::Unknown,
        }
    }
}

fn is_recipe(value: &Value) -> bool {
    match SchemaType::from(value.get("@type")) {
        SchemaType::Single(name) => name == "Recipe",
        SchemaType::List(names) => names.iter().any(|name| name.as_str() == Some("Recipe")),
        SchemaType::Unknown => false,
    }
}

/// Treat a field with an unexpected shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Escape raw control characters inside string literals, which some sites
/// emit unescaped in their JSON-LD
fn escape_control_characters(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    result.push(c);
                }
                '\\' => {
                    escaped = true;
                    result.push(c);
                }
                '"' => {
                    in_string = false;
                    result.push(c);
                }
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
        }
    }

    result
}

fn parse_block(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw).or_else(|_| serde_json::from_str(&escape_control_characters(raw)))
}

/// Top-level objects worth checking: the block itself, the items of a
/// top-level array, or the items of an `@graph` array
fn recipe_candidates(block: Value) -> Vec<Value> {
    match block {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("@graph") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(object)],
        },
        _ => Vec::new(),
    }
}

/// Every Recipe object embedded in the document's JSON-LD blocks, in page order.
///
/// Blocks that fail to parse are logged and skipped.
pub fn extract_structured_recipes(document: &Html) -> Vec<StructuredRecipe> {
    let mut recipes = Vec::new();

    for (index, script) in document.select(&JSON_LD_SELECTOR).enumerate() {
        let raw_json = script.text().collect::<String>();
        if raw_json.trim().is_empty() {
            continue;
        }

        let block = match parse_block(&raw_json) {
            Ok(block) => block,
            Err(e) => {
                warn!("Skipping malformed JSON-LD block {}: {}", index, e);
                continue;
            }
        };

        for candidate in recipe_candidates(block).into_iter().filter(is_recipe) {
            match serde_json::from_value::<StructuredRecipe>(candidate) {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => debug!("JSON-LD block {}: unreadable Recipe object: {}", index, e),
            }
        }
    }

    debug!("Found {} JSON-LD recipe(s)", recipes.len());
    recipes
}

/// Parse `html` and return every embedded Recipe object
pub fn extract_from_document(html: &str) -> Vec<StructuredRecipe> {
    extract_structured_recipes(&Html::parse_document(html))
}

/// Map a structured recipe onto the normalized shape.
///
/// Returns `None` when the name, ingredients or instructions are missing, or
/// when they normalize to nothing.
pub fn map_to_normalized_recipe(
    recipe: &StructuredRecipe,
    source_url: &str,
) -> Option<NormalizedRecipe> {
    let (Some(name), Some(ingredient_field), Some(instructions_field)) = (
        recipe.name.as_deref().filter(|name| !name.trim().is_empty()),
        recipe.recipe_ingredient.as_ref(),
        recipe.recipe_instructions.as_ref(),
    ) else {
        warn!("Recipe missing required fields (name, ingredients, or instructions)");
        return None;
    };

    if let Some(author) = recipe.author.as_ref().and_then(Author::display_name) {
        debug!("Mapping structured recipe '{}' by {}", name, author);
    }

    let times = reconcile_times(
        recipe.prep_time.as_deref(),
        recipe.cook_time.as_deref(),
        recipe.total_time.as_deref(),
    );

    let normalized = NormalizedRecipe {
        title: name.to_string(),
        description: recipe
            .description
            .as_ref()
            .and_then(|description| non_empty(description.text())),
        source_url: source_url.to_string(),
        image_url: recipe.image.as_ref().and_then(ImageField::url),
        prep_time_minutes: times.prep_minutes,
        cook_time_minutes: times.cook_minutes,
        servings: recipe.recipe_yield.as_ref().and_then(YieldField::servings),
        ingredients: parse_ingredient_lines(ingredient_field.lines()),
        steps: number_steps(instructions_field.instructions()),
        notes: None,
    };

    if !normalized.is_viable() {
        warn!(
            "Structured recipe '{}' has {} ingredients and {} steps after normalizing",
            name,
            normalized.ingredients.len(),
            normalized.steps.len()
        );
        return None;
    }

    Some(normalized)
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Result<Option<NormalizedRecipe>, ExtractError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);

        let recipes = extract_structured_recipes(&context.document);

        // Only the first recipe on the page is used
        let Some(first) = recipes.first() else {
            debug!("JsonLdExtractor: No Recipe objects found");
            return Ok(None);
        };
        if recipes.len() > 1 {
            debug!(
                "JsonLdExtractor: {} recipes found, using the first one",
                recipes.len()
            );
        }

        Ok(map_to_normalized_recipe(first, &context.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_html_document(json_ld: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        )
    }

    fn structured(value: Value) -> StructuredRecipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_is_recipe_by_tag_or_list() {
        assert!(is_recipe(&json!({"@type": "Recipe"})));
        assert!(is_recipe(&json!({"@type": ["Recipe", "NewsArticle"]})));
        assert!(!is_recipe(&json!({"@type": "recipe"})));
        assert!(!is_recipe(&json!({"@type": "WebPage"})));
        assert!(!is_recipe(&json!({"name": "Recipe"})));
        assert!(!is_recipe(&json!("Recipe")));
    }

    #[test]
    fn test_extract_direct_array_and_graph() {
        let html = format!(
            "{}{}{}",
            create_html_document(r#"{"@type": "Recipe", "name": "Direct"}"#),
            create_html_document(
                r#"[{"@type": "WebSite", "name": "Site"}, {"@type": "Recipe", "name": "From array"}]"#
            ),
            create_html_document(
                r#"{"@context": "https://schema.org", "@graph": [{"@type": "Person"}, {"@type": ["Recipe"], "name": "From graph"}]}"#
            ),
        );

        let recipes = extract_from_document(&html);
        let names: Vec<_> = recipes.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["Direct", "From array", "From graph"]);
    }

    #[test]
    fn test_malformed_block_does_not_hide_valid_ones() {
        let html = format!(
            "{}{}",
            create_html_document(r#"{"@type": "Recipe", "name": "#),
            create_html_document(r#"{"@type": "Recipe", "name": "Survivor"}"#),
        );

        let recipes = extract_from_document(&html);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name.as_deref(), Some("Survivor"));
    }

    #[test]
    fn test_raw_newline_inside_string_is_tolerated() {
        let html = create_html_document("{\"@type\": \"Recipe\", \"name\": \"Two\nLines\"}");
        let recipes = extract_from_document(&html);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name.as_deref(), Some("Two\nLines"));
    }

    #[test]
    fn test_escape_control_characters_leaves_escapes_alone() {
        assert_eq!(
            escape_control_characters("{\"a\": \"x\\\"y\tz\"}"),
            "{\"a\": \"x\\\"y\\tz\"}"
        );
        assert_eq!(escape_control_characters("{\n\"a\": 1}"), "{\n\"a\": 1}");
    }

    #[test]
    fn test_map_full_recipe() {
        let recipe = structured(json!({
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "description": "Delicious homemade cookies",
            "image": "https://example.com/cookie.jpg",
            "author": {"@type": "Person", "name": "Jane Doe"},
            "prepTime": "PT15M",
            "cookTime": "PT10M",
            "recipeYield": "24 cookies",
            "recipeIngredient": ["2 cups flour", "1 cup sugar, packed", "chocolate chips"],
            "recipeInstructions": "Mix ingredients. Bake at 350F for 10 minutes."
        }));

        let normalized = map_to_normalized_recipe(&recipe, "http://example.com").unwrap();
        assert_eq!(normalized.title, "Chocolate Chip Cookies");
        assert_eq!(normalized.description.as_deref(), Some("Delicious homemade cookies"));
        assert_eq!(normalized.image_url.as_deref(), Some("https://example.com/cookie.jpg"));
        assert_eq!(normalized.source_url, "http://example.com");
        assert_eq!(normalized.prep_time_minutes, Some(15));
        assert_eq!(normalized.cook_time_minutes, Some(10));
        assert_eq!(normalized.servings, Some(24));
        assert_eq!(normalized.ingredients.len(), 3);
        assert_eq!(normalized.ingredients[1].notes.as_deref(), Some("packed"));
        assert_eq!(normalized.ingredients[2].order_index, 2);
        assert_eq!(normalized.steps.len(), 2);
        assert_eq!(normalized.steps[0].instruction, "Mix ingredients");
        assert_eq!(normalized.steps[1].instruction, "Bake at 350F for 10 minutes.");
        assert_eq!(normalized.steps[1].step_number, 2);
    }

    #[test]
    fn test_missing_ingredients_rejects_recipe() {
        let recipe = structured(json!({
            "@type": "Recipe",
            "name": "No Ingredients",
            "image": "https://example.com/a.jpg",
            "prepTime": "PT5M",
            "recipeInstructions": ["Do the thing"]
        }));
        assert!(map_to_normalized_recipe(&recipe, "http://example.com").is_none());
    }

    #[test]
    fn test_missing_name_or_instructions_rejects_recipe() {
        let no_name = structured(json!({
            "@type": "Recipe",
            "recipeIngredient": ["salt"],
            "recipeInstructions": ["Season"]
        }));
        assert!(map_to_normalized_recipe(&no_name, "u").is_none());

        let no_instructions = structured(json!({
            "@type": "Recipe",
            "name": "Salt",
            "recipeIngredient": ["salt"]
        }));
        assert!(map_to_normalized_recipe(&no_instructions, "u").is_none());
    }

    #[test]
    fn test_empty_lists_reject_recipe() {
        let recipe = structured(json!({
            "@type": "Recipe",
            "name": "Empty",
            "recipeIngredient": [],
            "recipeInstructions": ["Wait"]
        }));
        assert!(map_to_normalized_recipe(&recipe, "u").is_none());
    }

    #[test]
    fn test_image_shapes() {
        let url = |value: Value| structured(json!({"image": value})).image.and_then(|i| i.url());
        assert_eq!(url(json!("https://a.jpg")).as_deref(), Some("https://a.jpg"));
        assert_eq!(url(json!(["https://b.jpg", "https://c.jpg"])).as_deref(), Some("https://b.jpg"));
        assert_eq!(url(json!({"@type": "ImageObject", "url": "https://d.jpg"})).as_deref(), Some("https://d.jpg"));
        assert_eq!(url(json!([{"url": "https://e.jpg"}])).as_deref(), Some("https://e.jpg"));
        assert_eq!(url(json!([])), None);
        assert_eq!(url(json!(42)), None);
        assert_eq!(url(json!({"@type": "ImageObject"})), None);
    }

    #[test]
    fn test_yield_shapes() {
        let servings =
            |value: Value| structured(json!({"recipeYield": value})).recipe_yield.and_then(|y| y.servings());
        assert_eq!(servings(json!(4)), Some(4));
        assert_eq!(servings(json!("6 servings")), Some(6));
        assert_eq!(servings(json!("Serves 8-10")), Some(8));
        assert_eq!(servings(json!(["12", "12 muffins"])), Some(12));
        assert_eq!(servings(json!("a few")), None);
        assert_eq!(servings(json!(0)), None);
    }

    #[test]
    fn test_instruction_shapes() {
        let steps = |value: Value| {
            structured(json!({"recipeInstructions": value}))
                .recipe_instructions
                .map(|i| i.instructions())
                .unwrap_or_default()
        };

        assert_eq!(steps(json!("Chop.\nFry. Serve")), vec!["Chop", "Fry", "Serve"]);
        assert_eq!(steps(json!(["  Chop ", "", "Fry"])), vec!["Chop", "Fry"]);
        assert_eq!(
            steps(json!([
                {"@type": "HowToStep", "text": "Boil water"},
                {"@type": "HowToStep", "name": "Add pasta"},
                {"@type": "HowToStep", "text": "", "name": "Drain"}
            ])),
            vec!["Boil water", "Add pasta", "Drain"]
        );
        assert_eq!(
            steps(json!([
                {"@type": "HowToSection", "name": "Sauce", "itemListElement": [
                    {"@type": "HowToStep", "text": "Simmer tomatoes"},
                    {"@type": "HowToStep", "text": "Season"}
                ]},
                {"@type": "HowToStep", "text": "Combine"}
            ])),
            vec!["Simmer tomatoes", "Season", "Combine"]
        );
    }

    #[test]
    fn test_odd_field_shapes_are_absent_not_fatal() {
        let recipe = structured(json!({
            "@type": "Recipe",
            "name": "Odd",
            "description": {"text": "Object description"},
            "prepTime": 15,
            "image": true,
            "recipeIngredient": "1 cup rice\n2 cups water",
            "recipeInstructions": ["Cook rice"]
        }));

        let normalized = map_to_normalized_recipe(&recipe, "u").unwrap();
        assert_eq!(normalized.description.as_deref(), Some("Object description"));
        assert_eq!(normalized.prep_time_minutes, None);
        assert_eq!(normalized.image_url, None);
        assert_eq!(normalized.ingredients.len(), 2);
        assert_eq!(normalized.ingredients[1].ingredient_name, "water");
    }

    #[test]
    fn test_author_display_name() {
        let author = |value: Value| structured(json!({"author": value})).author.and_then(|a| a.display_name());
        assert_eq!(author(json!("Jane")).as_deref(), Some("Jane"));
        assert_eq!(author(json!({"@type": "Person", "name": "Mario"})).as_deref(), Some("Mario"));
        assert_eq!(
            author(json!([{"name": "Chef One"}, {"name": "Chef Two"}])).as_deref(),
            Some("Chef One, Chef Two")
        );
        assert_eq!(author(json!({"@id": "#author"})), None);
    }

    #[test]
    fn test_extractor_uses_first_recipe_only() {
        let html = format!(
            "{}{}",
            create_html_document(
                r#"{"@type": "Recipe", "name": "First", "recipeIngredient": ["egg"], "recipeInstructions": "Boil the egg"}"#
            ),
            create_html_document(
                r#"{"@type": "Recipe", "name": "Second", "recipeIngredient": ["toast"], "recipeInstructions": "Toast it"}"#
            ),
        );
        let context = ParsingContext::new("http://example.com", &html);

        let recipe = JsonLdExtractor.parse(&context).unwrap().unwrap();
        assert_eq!(recipe.title, "First");
    }

    #[test]
    fn test_extractor_without_json_ld_returns_none() {
        let context = ParsingContext::new("http://example.com", "<html><body>Test</body></html>");
        assert!(JsonLdExtractor.parse(&context).unwrap().is_none());
    }
}
