use serde::{Deserialize, Serialize};

/// A recipe normalized from either structured data or page markup.
///
/// Only values for which [`NormalizedRecipe::is_viable`] holds ever leave the
/// extractors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecipe {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Minutes. Reconciled from a total duration this may be negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NormalizedRecipe {
    /// Minimum viable result: a title, at least one ingredient and at least one step.
    pub fn is_viable(&self) -> bool {
        !self.title.trim().is_empty() && !self.ingredients.is_empty() && !self.steps.is_empty()
    }
}

/// A single tokenized ingredient line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// May be empty when the line could not be tokenized
    pub ingredient_name: String,
    /// Kept verbatim ("1/2", "1 1/2", "0.5")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub order_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_number: usize,
    pub instruction: String,
}

/// Numbers instructions 1..=n, skipping blank ones so numbering has no gaps.
pub fn number_steps<I, S>(instructions: I) -> Vec<Step>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    instructions
        .into_iter()
        .map(Into::into)
        .filter(|instruction| !instruction.trim().is_empty())
        .enumerate()
        .map(|(index, instruction)| Step {
            step_number: index + 1,
            instruction,
        })
        .collect()
}
