//! Ingredient line tokenizing.
//!
//! Splits a free-text line such as `"2 lbs chicken breast, boneless skinless"`
//! into quantity, unit, name and notes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Ingredient;

/// Leading quantity: mixed number, simple fraction, or integer/decimal
static QUANTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?)\s*").unwrap());

/// Known units, tried in order. The first whole-word match wins.
#[rustfmt::skip]
pub const UNITS: &[&str] = &[
    "cup", "cups",
    "tablespoon", "tablespoons", "tbsp", "tbs", "tb",
    "teaspoon", "teaspoons", "tsp", "ts",
    "ounce", "ounces", "oz",
    "pound", "pounds", "lb", "lbs",
    "gram", "grams", "g",
    "kilogram", "kilograms", "kg",
    "milliliter", "milliliters", "ml",
    "liter", "liters", "l",
    "pint", "pints", "pt",
    "quart", "quarts", "qt",
    "gallon", "gallons", "gal",
    "piece", "pieces", "pc",
    "slice", "slices",
    "clove", "cloves",
    "pinch", "dash",
    "can", "cans",
    "package", "packages", "pkg",
    "bunch", "bunches",
];

/// Tokenize one ingredient line.
///
/// Blank input yields an ingredient with an empty name and nothing else set;
/// callers decide what to do with it.
pub fn parse_ingredient_line(text: &str, order_index: usize) -> Ingredient {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ingredient {
            order_index,
            ..Default::default()
        };
    }

    let (main, notes) = match trimmed.split_once(',') {
        Some((main, rest)) => {
            let rest = rest.trim();
            (main, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (trimmed, None),
    };

    let mut quantity = None;
    let mut unit = None;

    let ingredient_name = match QUANTITY_RE.captures(main) {
        Some(captures) => {
            quantity = captures.get(1).map(|m| m.as_str().trim().to_string());
            let consumed = captures.get(0).map_or(0, |m| m.end());
            let remaining = main[consumed..].trim();

            match match_unit(remaining) {
                Some(found) => {
                    unit = Some(found.to_string());
                    remaining[found.len()..].trim().to_string()
                }
                None => remaining.to_string(),
            }
        }
        None => main.trim().to_string(),
    };

    Ingredient {
        ingredient_name,
        quantity,
        unit,
        notes,
        order_index,
    }
}

/// Tokenize a list of lines, dropping blank ones. Order indexes follow the
/// position among the kept lines.
pub fn parse_ingredient_lines<I, S>(lines: I) -> Vec<Ingredient>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| !line.as_ref().trim().is_empty())
        .enumerate()
        .map(|(index, line)| parse_ingredient_line(line.as_ref(), index))
        .collect()
}

/// Case-insensitive whole-word prefix match against [`UNITS`]
fn match_unit(remaining: &str) -> Option<&'static str> {
    UNITS.iter().copied().find(|unit| {
        let Some(prefix) = remaining.get(..unit.len()) else {
            return false;
        };
        let boundary = remaining[unit.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'));
        prefix.eq_ignore_ascii_case(unit) && boundary
    })
}
