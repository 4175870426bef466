//! ISO 8601 durations (`PT1H30M`, `P1DT2H30M`, `PT45S`) to whole minutes.

use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"P(?:(\d+)D)?T?(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap()
});

/// Prep and cook minutes after reconciling against a total duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeTimes {
    pub prep_minutes: Option<i64>,
    pub cook_minutes: Option<i64>,
}

/// Parse a duration string into minutes.
///
/// Absent components count as zero and seconds round up to the next minute.
/// Returns `None` when nothing was recognized or the total is zero.
pub fn parse_duration(text: &str) -> Option<i64> {
    let captures = DURATION_RE.captures(text)?;

    let component = |index: usize| -> Option<i64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse::<i64>().ok(),
            None => Some(0),
        }
    };

    let days = component(1)?;
    let hours = component(2)?;
    let minutes = component(3)?;
    let seconds = component(4)?;

    let total = days
        .checked_mul(24 * 60)?
        .checked_add(hours.checked_mul(60)?)?
        .checked_add(minutes)?
        .checked_add(seconds.checked_add(59)? / 60)?;

    (total > 0).then_some(total)
}

/// Normalize prep/cook/total independently, then derive a missing prep or cook
/// value from the total when exactly one of them is known.
///
/// The derived value is not clamped: a sub-duration larger than the total
/// yields a negative number.
pub fn reconcile_times(prep: Option<&str>, cook: Option<&str>, total: Option<&str>) -> RecipeTimes {
    let prep_minutes = prep.and_then(parse_duration);
    let cook_minutes = cook.and_then(parse_duration);
    let total_minutes = total.and_then(parse_duration);

    match (prep_minutes, cook_minutes, total_minutes) {
        (Some(prep), None, Some(total)) => RecipeTimes {
            prep_minutes: Some(prep),
            cook_minutes: Some(total - prep),
        },
        (None, Some(cook), Some(total)) => RecipeTimes {
            prep_minutes: Some(total - cook),
            cook_minutes: Some(cook),
        },
        _ => RecipeTimes {
            prep_minutes,
            cook_minutes,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_components() {
        assert_eq!(parse_duration("PT15M"), Some(15));
        assert_eq!(parse_duration("PT1H"), Some(60));
        assert_eq!(parse_duration("PT1H30M"), Some(90));
        assert_eq!(parse_duration("PT2H45M"), Some(165));
        assert_eq!(parse_duration("P1DT2H30M"), Some(1590));
        assert_eq!(parse_duration("P1D"), Some(1440));
    }

    #[test]
    fn test_parse_duration_rounds_seconds_up() {
        assert_eq!(parse_duration("PT45S"), Some(1));
        assert_eq!(parse_duration("PT60S"), Some(1));
        assert_eq!(parse_duration("PT61S"), Some(2));
        assert_eq!(parse_duration("PT10M30S"), Some(11));
    }

    #[test]
    fn test_parse_duration_absent() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("30 minutes"), None);
        assert_eq!(parse_duration("PT0M"), None);
        assert_eq!(parse_duration("PT"), None);
    }

    #[test]
    fn test_reconcile_derives_missing_cook_time() {
        let times = reconcile_times(Some("PT20M"), None, Some("PT50M"));
        assert_eq!(times.prep_minutes, Some(20));
        assert_eq!(times.cook_minutes, Some(30));
    }

    #[test]
    fn test_reconcile_derives_missing_prep_time() {
        let times = reconcile_times(None, Some("PT1H"), Some("PT1H15M"));
        assert_eq!(times.prep_minutes, Some(15));
        assert_eq!(times.cook_minutes, Some(60));
    }

    #[test]
    fn test_reconcile_keeps_independent_values() {
        let times = reconcile_times(Some("PT10M"), Some("PT20M"), Some("PT2H"));
        assert_eq!(times.prep_minutes, Some(10));
        assert_eq!(times.cook_minutes, Some(20));

        let times = reconcile_times(None, None, Some("PT2H"));
        assert_eq!(times, RecipeTimes::default());
    }

    #[test]
    fn test_reconcile_does_not_clamp_negative_result() {
        let times = reconcile_times(Some("PT40M"), None, Some("PT30M"));
        assert_eq!(times.prep_minutes, Some(40));
        assert_eq!(times.cook_minutes, Some(-10));
    }
}
