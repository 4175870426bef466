//! Selector catalog for the DOM fallback.
//!
//! Each list is tried in order; earlier entries are more specific to recipe
//! markup than later ones.

use scraper::{ElementRef, Selector};

use crate::error::ExtractError;

/// Where a matched element's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Concatenated text content
    Text,
    /// A named attribute (`content` on meta tags, `src` on images)
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub css: &'static str,
    pub read: Read,
}

impl Rule {
    const fn text(css: &'static str) -> Self {
        Rule {
            css,
            read: Read::Text,
        }
    }

    const fn attr(css: &'static str, name: &'static str) -> Self {
        Rule {
            css,
            read: Read::Attr(name),
        }
    }

    /// Raw (uncleaned) value of `element` according to this rule
    pub fn read_from(&self, element: ElementRef) -> Option<String> {
        match self.read {
            Read::Text => Some(element_text(element)),
            Read::Attr(name) => element.value().attr(name).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Prep,
    Cook,
    /// Matched but not attributed to prep or cook (total time, bare `<time>`)
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRule {
    pub css: &'static str,
    pub kind: TimeKind,
}

pub const TITLE: &[Rule] = &[
    Rule::text("h1.recipe-title"),
    Rule::text(r#"h1[itemprop="name"]"#),
    Rule::text("h1.entry-title"),
    Rule::text("h1.post-title"),
    Rule::text(r#"[class*="recipe"] h1"#),
    Rule::text("article h1"),
    Rule::text("h1"),
];

pub const TITLE_META: &[Rule] = &[
    Rule::attr(r#"meta[property="og:title"]"#, "content"),
    Rule::attr(r#"meta[name="twitter:title"]"#, "content"),
    Rule::text("title"),
];

pub const DESCRIPTION: &[Rule] = &[
    Rule::attr(r#"meta[property="og:description"]"#, "content"),
    Rule::attr(r#"meta[name="description"]"#, "content"),
    Rule::text(r#"[itemprop="description"]"#),
    Rule::text("div.recipe-description"),
    Rule::text("p.recipe-description"),
];

pub const INGREDIENT_CONTAINERS: &[&str] = &[
    "ul.ingredients",
    "ol.ingredients",
    r#"ul[class*="ingredient"]"#,
    r#"ol[class*="ingredient"]"#,
    r#"ul[class*="recipe-ingredient"]"#,
    r#"[itemprop="recipeIngredient"]"#,
    r#"[class*="ingredient-list"]"#,
    "div.ingredients ul",
    "div.ingredients ol",
    r#"section[class*="ingredient"] ul"#,
    r#"section[class*="ingredient"] ol"#,
];

pub const INGREDIENT_ITEMS: &[&str] = &[
    r#"li[itemprop="recipeIngredient"]"#,
    "li",
    r#"p[itemprop="recipeIngredient"]"#,
    r#"div[itemprop="recipeIngredient"]"#,
];

/// Page-wide fallback when no ingredient container yields anything
pub const GENERIC_INGREDIENT_ITEMS: &str = "ul li, ol li";

pub const INSTRUCTION_CONTAINERS: &[&str] = &[
    "ol.instructions",
    "ol.recipe-instructions",
    r#"ol[class*="instruction"]"#,
    r#"ol[class*="direction"]"#,
    r#"ol[class*="step"]"#,
    r#"[itemprop="recipeInstructions"]"#,
    "div.instructions ol",
    r#"div[class*="instruction"] ol"#,
    r#"section[class*="instruction"] ol"#,
    r#"section[class*="direction"] ol"#,
];

pub const INSTRUCTION_ITEMS: &[&str] = &[
    r#"li[itemprop="step"]"#,
    r#"li[class*="step"]"#,
    "li",
    r#"div[class*="step"]"#,
    r#"p[class*="step"]"#,
];

/// Page-wide fallback when no instruction container yields anything
pub const GENERIC_INSTRUCTION_ITEMS: &str = "ol li";

pub const IMAGE: &[Rule] = &[
    Rule::attr(r#"meta[property="og:image"]"#, "content"),
    Rule::attr(r#"meta[name="twitter:image"]"#, "content"),
    Rule::attr(r#"img[itemprop="image"]"#, "src"),
    Rule::attr(r#"img[class*="recipe-image"]"#, "src"),
    Rule::attr(r#"img[class*="recipe-photo"]"#, "src"),
    Rule::attr("article img", "src"),
    Rule::attr(r#"[class*="recipe"] img"#, "src"),
    Rule::attr("img", "src"),
];

pub const TIME: &[TimeRule] = &[
    TimeRule {
        css: r#"[itemprop="prepTime"]"#,
        kind: TimeKind::Prep,
    },
    TimeRule {
        css: r#"[itemprop="cookTime"]"#,
        kind: TimeKind::Cook,
    },
    TimeRule {
        css: r#"[itemprop="totalTime"]"#,
        kind: TimeKind::Other,
    },
    TimeRule {
        css: r#"[class*="prep-time"]"#,
        kind: TimeKind::Prep,
    },
    TimeRule {
        css: r#"[class*="cook-time"]"#,
        kind: TimeKind::Cook,
    },
    TimeRule {
        css: r#"[class*="total-time"]"#,
        kind: TimeKind::Other,
    },
    TimeRule {
        css: "time[datetime]",
        kind: TimeKind::Other,
    },
];

pub const SERVINGS: &[&str] = &[
    r#"[itemprop="recipeYield"]"#,
    r#"[class*="yield"]"#,
    r#"[class*="serving"]"#,
    r#"span[class*="servings"]"#,
];

pub const NOTES: &[&str] = &[
    ".wprm-recipe-notes",
    ".tasty-recipes-notes",
    ".mv-create-notes",
    r#"[class*="recipe-notes"]"#,
    r#"[class*="recipe-tips"]"#,
];

/// Compile a catalog entry. The catalog is static, so a failure here is an
/// internal error rather than a property of the page.
pub fn compile(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::SelectorError(css.to_string()))
}

/// Text content of an element, text nodes concatenated as rendered
pub fn element_text(element: ElementRef) -> String {
    element.text().collect()
}
