use super::{Extractor, ParsingContext};
use crate::duration::{parse_duration, RecipeTimes};
use crate::error::ExtractError;
use crate::ingredient::parse_ingredient_line;
use crate::model::{number_steps, Ingredient, NormalizedRecipe};
use crate::selectors::{self, Rule, TimeKind};
use crate::text::{
    clean_text, clean_title, extract_servings, extract_time_in_minutes, is_likely_ingredient,
    is_likely_instruction, parse_times_from_text, split_into_steps,
};
use log::{debug, warn};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Elements whose text never shows up on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Fallback extractor that reads the page markup with the selector catalog
/// and text heuristics.
pub struct DomExtractor;

impl Extractor for DomExtractor {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn parse(&self, context: &ParsingContext) -> Result<Option<NormalizedRecipe>, ExtractError> {
        extract_recipe(&context.document, &context.url)
    }
}

/// Parse `html` and extract a recipe from its markup alone.
pub fn extract_from_markup(
    html: &str,
    source_url: &str,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    extract_recipe(&Html::parse_document(html), source_url)
}

fn extract_recipe(
    document: &Html,
    source_url: &str,
) -> Result<Option<NormalizedRecipe>, ExtractError> {
    debug!("DomExtractor: Attempting DOM-based parsing for: {}", source_url);

    let title = extract_title(document)?;
    let ingredients = extract_ingredients(document)?;
    let steps = extract_instructions(document)?;

    let Some(title) = title else {
        warn!(
            "DomExtractor: No title found ({} ingredients, {} steps)",
            ingredients.len(),
            steps.len()
        );
        return Ok(None);
    };

    let body_text = visible_text(document);
    let times = extract_times(document, &body_text)?;

    let recipe = NormalizedRecipe {
        title,
        description: extract_description(document)?,
        source_url: source_url.to_string(),
        image_url: extract_image_url(document)?,
        prep_time_minutes: times.prep_minutes,
        cook_time_minutes: times.cook_minutes,
        servings: extract_servings_from_dom(document, &body_text)?,
        ingredients,
        steps: number_steps(steps),
        notes: extract_notes(document)?,
    };

    if !recipe.is_viable() {
        warn!(
            "DomExtractor: Insufficient data: title={}, ingredients={}, steps={}",
            recipe.title,
            recipe.ingredients.len(),
            recipe.steps.len()
        );
        return Ok(None);
    }

    debug!(
        "DomExtractor: Parsed '{}' ({} ingredients, {} steps)",
        recipe.title,
        recipe.ingredients.len(),
        recipe.steps.len()
    );
    Ok(Some(recipe))
}

fn first_match<'a>(document: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>, ExtractError> {
    let selector = selectors::compile(css)?;
    Ok(document.select(&selector).next())
}

/// First rule whose first match reads to a non-empty value after `clean`
fn first_rule_value(
    document: &Html,
    rules: &[Rule],
    clean: fn(&str) -> String,
) -> Result<Option<String>, ExtractError> {
    for rule in rules {
        let Some(element) = first_match(document, rule.css)? else {
            continue;
        };
        if let Some(value) = rule.read_from(element).map(|raw| clean(&raw)) {
            if !value.is_empty() {
                debug!("DomExtractor: Matched `{}`", rule.css);
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

fn extract_title(document: &Html) -> Result<Option<String>, ExtractError> {
    match first_rule_value(document, selectors::TITLE, clean_title)? {
        Some(title) => Ok(Some(title)),
        None => first_rule_value(document, selectors::TITLE_META, clean_title),
    }
}

fn extract_description(document: &Html) -> Result<Option<String>, ExtractError> {
    first_rule_value(document, selectors::DESCRIPTION, clean_text)
}

fn extract_notes(document: &Html) -> Result<Option<String>, ExtractError> {
    for css in selectors::NOTES {
        if let Some(element) = first_match(document, css)? {
            let notes = clean_text(&selectors::element_text(element));
            if !notes.is_empty() {
                return Ok(Some(notes));
            }
        }
    }
    Ok(None)
}

fn accept_ingredient(element: ElementRef, into: &mut Vec<Ingredient>) {
    let text = clean_text(&selectors::element_text(element));
    if text.is_empty() || !is_likely_ingredient(&text) {
        return;
    }
    let ingredient = parse_ingredient_line(&text, into.len());
    if !ingredient.ingredient_name.is_empty() {
        into.push(ingredient);
    }
}

fn extract_ingredients(document: &Html) -> Result<Vec<Ingredient>, ExtractError> {
    let items = selectors::compile(&selectors::INGREDIENT_ITEMS.join(", "))?;
    let mut ingredients = Vec::new();

    for css in selectors::INGREDIENT_CONTAINERS {
        let Some(container) = first_match(document, css)? else {
            continue;
        };
        for item in container.select(&items) {
            accept_ingredient(item, &mut ingredients);
        }
        if !ingredients.is_empty() {
            debug!(
                "DomExtractor: Found {} ingredients in `{}`",
                ingredients.len(),
                css
            );
            return Ok(ingredients);
        }
    }

    let generic = selectors::compile(selectors::GENERIC_INGREDIENT_ITEMS)?;
    for item in document.select(&generic) {
        accept_ingredient(item, &mut ingredients);
    }
    debug!(
        "DomExtractor: Found {} ingredients in generic list items",
        ingredients.len()
    );
    Ok(ingredients)
}

fn accept_instruction(element: ElementRef, into: &mut Vec<String>) {
    let text = clean_text(&selectors::element_text(element));
    if !text.is_empty() && is_likely_instruction(&text) {
        into.push(text);
    }
}

fn extract_instructions(document: &Html) -> Result<Vec<String>, ExtractError> {
    let items = selectors::compile(&selectors::INSTRUCTION_ITEMS.join(", "))?;
    let mut steps = Vec::new();

    for css in selectors::INSTRUCTION_CONTAINERS {
        let Some(container) = first_match(document, css)? else {
            continue;
        };
        for item in container.select(&items) {
            accept_instruction(item, &mut steps);
        }
        if !steps.is_empty() {
            debug!("DomExtractor: Found {} steps in `{}`", steps.len(), css);
            return Ok(steps);
        }
    }

    let generic = selectors::compile(selectors::GENERIC_INSTRUCTION_ITEMS)?;
    for item in document.select(&generic) {
        accept_instruction(item, &mut steps);
    }
    if !steps.is_empty() {
        return Ok(steps);
    }

    // Last resort: split the first container's whole text
    for css in selectors::INSTRUCTION_CONTAINERS {
        let Some(container) = first_match(document, css)? else {
            continue;
        };
        // Raw text keeps the line breaks the splitter looks for
        let text = selectors::element_text(container);
        if !clean_text(&text).is_empty() {
            debug!("DomExtractor: Splitting text of `{}` into steps", css);
            return Ok(split_into_steps(&text));
        }
    }

    Ok(steps)
}

fn extract_image_url(document: &Html) -> Result<Option<String>, ExtractError> {
    for rule in selectors::IMAGE {
        let Some(element) = first_match(document, rule.css)? else {
            continue;
        };
        if let Some(url) = rule.read_from(element) {
            if url.starts_with("http://") || url.starts_with("https://") {
                return Ok(Some(url));
            }
        }
    }
    Ok(None)
}

/// Minutes from a time element: its `datetime` attribute if present,
/// otherwise its text
fn time_element_minutes(element: ElementRef) -> Option<i64> {
    let minutes = match element.value().attr("datetime") {
        Some(datetime) => parse_duration(datetime),
        None => extract_time_in_minutes(&clean_text(&selectors::element_text(element))),
    };
    minutes.filter(|minutes| *minutes > 0)
}

fn extract_times(document: &Html, body_text: &str) -> Result<RecipeTimes, ExtractError> {
    let mut times = RecipeTimes::default();

    for rule in selectors::TIME {
        let slot = match rule.kind {
            TimeKind::Prep => &mut times.prep_minutes,
            TimeKind::Cook => &mut times.cook_minutes,
            TimeKind::Other => continue,
        };
        if slot.is_some() {
            continue;
        }
        if let Some(element) = first_match(document, rule.css)? {
            *slot = time_element_minutes(element);
        }
    }

    if times.prep_minutes.is_none() && times.cook_minutes.is_none() {
        debug!("DomExtractor: No time elements, scanning page text");
        times = parse_times_from_text(body_text);
    }

    Ok(times)
}

fn extract_servings_from_dom(
    document: &Html,
    body_text: &str,
) -> Result<Option<u32>, ExtractError> {
    for css in selectors::SERVINGS {
        if let Some(element) = first_match(document, css)? {
            let text = clean_text(&selectors::element_text(element));
            if let Some(servings) = extract_servings(&text) {
                return Ok(Some(servings));
            }
        }
    }
    Ok(extract_servings(body_text))
}

/// Rendered text of the page body, one line per text node
fn visible_text(document: &Html) -> String {
    let mut lines = Vec::new();
    if let Some(body) = document.select(&BODY_SELECTOR).next() {
        collect_visible_text(body, &mut lines);
    }
    lines.join("\n")
}

fn collect_visible_text(element: ElementRef, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child.value().name()) {
                collect_visible_text(child, lines);
            }
        }
    }
}
