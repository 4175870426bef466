//! Text heuristics for unstructured recipe markup.
//!
//! Cleaning of scraped fragments, minute/serving extraction from prose,
//! instruction splitting and ingredient/instruction classification.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use crate::duration::RecipeTimes;

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[☐☑☒□■○●•‣⁃]\s*").unwrap());
// A list number is followed by whitespace, so "0.5 kg" keeps its quantity
static ORDINAL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)](?:\s+|$)").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static TITLE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*[-|]\s*(?:recipe|allrecipes|food network|bon appétit|serious eats|tasty|epicurious).*$",
    )
    .unwrap()
});

// No look-ahead in `regex`: "not followed by a word character" consumes one
// non-word character (or the end of input) instead.
static HOUR_MINUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+)\s*(?:hours|hour|hrs|hr|h)(?:\s*(\d+)\s*(?:minutes|minute|mins|min|m))?(?:\W|$)",
    )
    .unwrap()
});
static MINUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:minutes|minute|mins|min|m)(?:\W|$)").unwrap());
static HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:hours|hour|hrs|hr|h)(?:\W|$)").unwrap());

static PREP_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)prep(?:\s+time)?[:\s]+([^\n]+?)(?:\n|cook|total|$)").unwrap()
});
static COOK_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cook(?:\s+time)?[:\s]+([^\n]+?)(?:\n|prep|total|$)").unwrap()
});

static SERVES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:serves?|yield|makes?)[:\s]+(\d+)").unwrap());
// The leading guard keeps "6" in "4-6 servings" from matching; ranges are the
// next pattern's job.
static SERVING_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d\s-])\s*(\d+)\s*(?:serving|portion|people)").unwrap()
});
static SERVING_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*-\s*\d+\s*(?:serving|portion)").unwrap());

static ORDINAL_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+[.)]\s+").unwrap());
static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());

/// Page chrome and section headers that never make an ingredient or a step
static COMMON_EXCLUDES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^(?:print|save|share|pin|email|comment|rating|review|subscribe)$",
        r"^(?:ingredients|instructions|directions|steps|method|preparation)$",
        r"^\d+\s*star",
    ])
    .unwrap()
});
static INGREDIENT_EXCLUDES: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new([r"recipe", r"^by\s+"]).unwrap());

/// Trim, decode the common entities, drop leading bullet glyphs and `N.`/`N)`
/// list numbers, and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let decoded = text
        .trim()
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let mut rest = decoded.trim();
    while let Some(marker) = BULLET_RE.find(rest).or_else(|| ORDINAL_PREFIX_RE.find(rest)) {
        rest = rest[marker.end()..].trim_start();
    }

    WHITESPACE_RE
        .replace_all(rest, " ")
        .trim()
        .to_string()
}

/// [`clean_text`] plus removal of a trailing site suffix such as
/// `" | Allrecipes"` or `" - Recipe"`.
pub fn clean_title(title: &str) -> String {
    let cleaned = clean_text(title);
    TITLE_SUFFIX_RE.replace(&cleaned, "").trim().to_string()
}

/// Minutes mentioned in prose: "1 hour 15 minutes", "45 mins", "2 hrs".
pub fn extract_time_in_minutes(text: &str) -> Option<i64> {
    let lowered = text.to_lowercase();

    if let Some(captures) = HOUR_MINUTE_RE.captures(&lowered) {
        let hours = number_at(&captures, 1)?;
        let minutes = match captures.get(2) {
            Some(m) => m.as_str().parse::<i64>().ok()?,
            None => 0,
        };
        return hours.checked_mul(60)?.checked_add(minutes);
    }

    if let Some(captures) = MINUTE_RE.captures(&lowered) {
        return number_at(&captures, 1);
    }

    if let Some(captures) = HOUR_RE.captures(&lowered) {
        return number_at(&captures, 1)?.checked_mul(60);
    }

    None
}

/// Scan free text for "Prep ..." and "Cook ..." segments.
pub fn parse_times_from_text(text: &str) -> RecipeTimes {
    let lowered = text.to_lowercase();

    let segment_minutes = |re: &Regex| {
        re.captures(&lowered)
            .and_then(|captures| captures.get(1))
            .and_then(|segment| extract_time_in_minutes(segment.as_str()))
    };

    RecipeTimes {
        prep_minutes: segment_minutes(&*PREP_SEGMENT_RE),
        cook_minutes: segment_minutes(&*COOK_SEGMENT_RE),
    }
}

/// Serving count from prose: "Serves: 4", "6 servings", "4-6 servings" (first number).
pub fn extract_servings(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();

    [&*SERVES_RE, &*SERVING_COUNT_RE, &*SERVING_RANGE_RE]
        .iter()
        .find_map(|re| re.captures(&lowered))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|servings| *servings > 0)
}

/// Break a block of instructions into steps.
///
/// Tries ordinal markers, then line breaks, then sentence boundaries (keeping
/// only substantial sentences). Falls back to the whole cleaned text.
pub fn split_into_steps(text: &str) -> Vec<String> {
    let numbered = non_blank(ORDINAL_MARKER_RE.split(text));
    if numbered.len() > 1 {
        return clean_all(numbered);
    }

    let lines = non_blank(LINE_BREAK_RE.split(text));
    if lines.len() > 1 {
        return clean_all(lines);
    }

    let sentences: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|sentence| sentence.trim().chars().count() > 20)
        .collect();
    if sentences.len() > 1 {
        return clean_all(sentences);
    }

    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        Vec::new()
    } else {
        vec![cleaned]
    }
}

pub fn is_likely_ingredient(text: &str) -> bool {
    if text.chars().count() < 2 {
        return false;
    }

    let lowered = text.trim().to_lowercase();
    if COMMON_EXCLUDES.is_match(&lowered) || INGREDIENT_EXCLUDES.is_match(&lowered) {
        return false;
    }

    (2..200).contains(&lowered.chars().count())
}

pub fn is_likely_instruction(text: &str) -> bool {
    if text.chars().count() < 10 {
        return false;
    }

    let lowered = text.trim().to_lowercase();
    if COMMON_EXCLUDES.is_match(&lowered) {
        return false;
    }

    (10..1000).contains(&lowered.chars().count())
}

fn number_at(captures: &regex::Captures, index: usize) -> Option<i64> {
    captures.get(index)?.as_str().parse().ok()
}

fn non_blank<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    pieces.filter(|piece| !piece.trim().is_empty()).collect()
}

fn clean_all(pieces: Vec<&str>) -> Vec<String> {
    pieces
        .into_iter()
        .map(clean_text)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Split on ". " when the next character is an uppercase ASCII letter
fn split_sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BREAK_RE.find_iter(text) {
        if text[boundary.end()..].starts_with(|c: char| c.is_ascii_uppercase()) {
            pieces.push(&text[start..boundary.start()]);
            start = boundary.end();
        }
    }
    pieces.push(&text[start..]);

    pieces
}
