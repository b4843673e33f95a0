//! Temporal normalization
//!
//! Converts natural-language date and time expressions into calendar
//! dates and 24-hour `HH:MM` strings. Both functions are total: they
//! never fail to the caller. Unparseable dates fall back to today;
//! unparseable times fall back to the empty string, which callers must
//! treat as "no time given".

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Absolute date formats, tried in order. The first success wins.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
];

/// Named day periods mapped to default 24-hour times.
///
/// Scanned longest-keyword-first so that "late afternoon" wins over
/// "afternoon" and "mid morning" over "morning".
const TIME_PERIODS: [(&str, &str); 27] = [
    ("early morning", "07:00"),
    ("dawn", "06:00"),
    ("sunrise", "06:30"),
    ("morning", "09:00"),
    ("mid morning", "10:30"),
    ("mid-morning", "10:30"),
    ("late morning", "11:30"),
    ("noon", "12:00"),
    ("midday", "12:00"),
    ("lunch", "12:30"),
    ("lunch time", "12:30"),
    ("lunchtime", "12:30"),
    ("afternoon", "14:00"),
    ("early afternoon", "13:30"),
    ("mid afternoon", "15:00"),
    ("mid-afternoon", "15:00"),
    ("late afternoon", "16:30"),
    ("evening", "18:00"),
    ("early evening", "17:30"),
    ("late evening", "20:00"),
    ("dinner", "19:00"),
    ("dinner time", "19:00"),
    ("dinnertime", "19:00"),
    ("night", "21:00"),
    ("late night", "23:00"),
    ("midnight", "00:00"),
    ("start of day", "08:00"),
];

/// Extra work-day periods that don't fit the day-part families.
const WORK_PERIODS: [(&str, &str); 3] = [
    ("end of day", "17:00"),
    ("close of business", "17:00"),
    ("business hours", "14:00"),
];

/// Periods that bias an ambiguous hour toward the morning.
const AM_PERIODS: [&str; 7] = [
    "morning",
    "early morning",
    "dawn",
    "sunrise",
    "mid morning",
    "mid-morning",
    "late morning",
];

/// Periods that bias an ambiguous hour toward afternoon/evening.
const PM_PERIODS: [&str; 13] = [
    "afternoon",
    "early afternoon",
    "mid afternoon",
    "mid-afternoon",
    "late afternoon",
    "evening",
    "early evening",
    "late evening",
    "night",
    "late night",
    "dinner",
    "dinner time",
    "dinnertime",
];

static RE_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})\s*(am|pm)?").expect("valid regex"));
static RE_HOUR_MERIDIEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*(am|pm)").expect("valid regex"));
static RE_AROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"around\s+(\d{1,2})").expect("valid regex"));
static RE_ABOUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"about\s+(\d{1,2})").expect("valid regex"));
static RE_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bat\s+(\d{1,2})").expect("valid regex"));
static RE_BARE_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})$").expect("valid regex"));

/// Parse a natural-language date expression into a calendar date.
///
/// Recognizes `today`/`now`, `yesterday`, `tomorrow`, then the fixed
/// ordered list of absolute formats. Fails soft: anything unparseable
/// logs a warning and yields today's date.
pub fn parse_date(text: &str) -> NaiveDate {
    let today = Local::now().date_naive();
    let normalized = text.trim().to_lowercase();

    if normalized.is_empty() {
        return today;
    }

    match normalized.as_str() {
        "today" | "now" => return today,
        "yesterday" => return today - Duration::days(1),
        "tomorrow" => return today + Duration::days(1),
        _ => {}
    }

    for format in DATE_FORMATS {
        if format.contains("%H") {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
                return dt.date();
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
            return date;
        }
    }

    tracing::warn!(input = text, "could not parse date, using today");
    today
}

/// One parsed clock match before meridiem resolution.
struct ClockMatch {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

#[derive(Clone, Copy, PartialEq)]
enum Meridiem {
    Am,
    Pm,
}

fn meridiem_of(s: &str) -> Option<Meridiem> {
    match s {
        "am" => Some(Meridiem::Am),
        "pm" => Some(Meridiem::Pm),
        _ => None,
    }
}

/// Scan for an explicit clock expression. `allow_bare` additionally
/// accepts a lone number when it is the entire input.
fn find_clock(text: &str, allow_bare: bool) -> Option<ClockMatch> {
    if let Some(caps) = RE_CLOCK.captures(text) {
        return Some(ClockMatch {
            hour: caps[1].parse().ok()?,
            minute: caps[2].parse().ok()?,
            meridiem: caps.get(3).and_then(|m| meridiem_of(m.as_str())),
        });
    }
    if let Some(caps) = RE_HOUR_MERIDIEM.captures(text) {
        return Some(ClockMatch {
            hour: caps[1].parse().ok()?,
            minute: 0,
            meridiem: meridiem_of(&caps[2]),
        });
    }
    for re in [&*RE_AROUND, &*RE_ABOUT, &*RE_AT] {
        if let Some(caps) = re.captures(text) {
            return Some(ClockMatch {
                hour: caps[1].parse().ok()?,
                minute: 0,
                meridiem: None,
            });
        }
    }
    if allow_bare {
        if let Some(caps) = RE_BARE_HOUR.captures(text) {
            return Some(ClockMatch {
                hour: caps[1].parse().ok()?,
                minute: 0,
                meridiem: None,
            });
        }
    }
    None
}

/// Resolve an explicit meridiem: 12 AM -> 0, 12 PM stays 12, PM shifts
/// an ambiguous hour past noon. Returns None for nonsense clock values.
fn resolve(m: ClockMatch, period: Option<&str>) -> Option<String> {
    if m.hour > 23 || m.minute > 59 {
        return None;
    }
    let mut hour = m.hour;

    match m.meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        Some(_) => {}
        None => {
            // Infer from the period context when no meridiem was stated.
            if let Some(period) = period {
                if AM_PERIODS.contains(&period) {
                    // Already a 24-hour value; bring it back into the morning.
                    if hour > 12 {
                        hour -= 12;
                    }
                } else if PM_PERIODS.contains(&period) && hour < 12 {
                    hour += 12;
                }
            }
        }
    }

    Some(format!("{:02}:{:02}", hour, m.minute))
}

/// Parse a natural-language time expression into `HH:MM`, or return the
/// empty string when no time is present.
///
/// Three tiers:
/// 1. A named period ("late afternoon", "lunch time") selects a default
///    time, unless the same text also carries an explicit clock value,
///    which then wins with the period deciding AM/PM.
/// 2. A standalone clock expression anywhere in the text.
/// 3. Nothing matches: empty string.
pub fn parse_time(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return String::new();
    }

    // Longest keyword first so compound periods win over their suffixes.
    let mut periods: Vec<(&str, &str)> = TIME_PERIODS
        .iter()
        .chain(WORK_PERIODS.iter())
        .copied()
        .collect();
    periods.sort_by_key(|(keyword, _)| std::cmp::Reverse(keyword.len()));

    for (keyword, default_time) in periods {
        if normalized.contains(keyword) {
            if let Some(explicit) = find_clock(&normalized, false) {
                if let Some(time) = resolve(explicit, Some(keyword)) {
                    return time;
                }
            }
            return default_time.to_string();
        }
    }

    if let Some(clock) = find_clock(&normalized, true) {
        if let Some(time) = resolve(clock, None) {
            return time;
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_relative_dates() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date("today"), today);
        assert_eq!(parse_date("now"), today);
        assert_eq!(parse_date("yesterday"), today - Duration::days(1));
        assert_eq!(parse_date("tomorrow"), today + Duration::days(1));
        assert_eq!(parse_date(""), today);
    }

    #[test]
    fn test_absolute_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15"), expected);
        assert_eq!(parse_date("01/15/2024"), expected);
        assert_eq!(parse_date("January 15, 2024"), expected);
        assert_eq!(parse_date("Jan 15, 2024"), expected);
        assert_eq!(parse_date("15-1-2024"), expected);
    }

    #[test]
    fn test_unparseable_date_falls_back_to_today() {
        assert_eq!(parse_date("the day after the conference"), Local::now().date_naive());
    }

    #[test]
    fn test_exact_times() {
        assert_eq!(parse_time("9:15"), "09:15");
        assert_eq!(parse_time("4:10 PM"), "16:10");
        assert_eq!(parse_time("14:30"), "14:30");
        assert_eq!(parse_time("9 AM"), "09:00");
        assert_eq!(parse_time("4 pm"), "16:00");
    }

    #[test]
    fn test_approximate_times() {
        assert_eq!(parse_time("around 9"), "09:00");
        assert_eq!(parse_time("about 3"), "03:00");
        assert_eq!(parse_time("at 7"), "07:00");
        assert_eq!(parse_time("9"), "09:00");
    }

    #[test]
    fn test_period_defaults() {
        assert_eq!(parse_time("morning"), "09:00");
        assert_eq!(parse_time("late afternoon"), "16:30");
        assert_eq!(parse_time("lunch time"), "12:30");
        assert_eq!(parse_time("midnight"), "00:00");
        assert_eq!(parse_time("close of business"), "17:00");
    }

    #[test]
    fn test_longest_period_wins() {
        // "late afternoon" contains "afternoon"; the longer keyword decides.
        assert_eq!(parse_time("sometime late afternoon"), "16:30");
        assert_eq!(parse_time("mid morning catch-up"), "10:30");
    }

    #[test]
    fn test_period_with_explicit_time() {
        assert_eq!(parse_time("morning at 9:15"), "09:15");
        assert_eq!(parse_time("evening around 6"), "18:00");
        assert_eq!(parse_time("afternoon at 3"), "15:00");
    }

    #[test]
    fn test_morning_period_does_not_shift_past_noon() {
        // A 24-hour value inside a morning period comes back to AM.
        assert_eq!(parse_time("morning at 14:00"), "02:00");
        // Explicit meridiem always wins over the period bias.
        assert_eq!(parse_time("morning at 9 pm"), "21:00");
    }

    #[test]
    fn test_noon_and_midnight_meridiem() {
        assert_eq!(parse_time("12 am"), "00:00");
        assert_eq!(parse_time("12 pm"), "12:00");
    }

    #[test]
    fn test_no_time_gives_empty() {
        assert_eq!(parse_time(""), "");
        assert_eq!(parse_time("we discussed cardiology outcomes"), "");
    }

    #[test]
    fn test_at_requires_word_boundary() {
        // "that 5" must not read as "at 5".
        assert_eq!(parse_time("that 5 colleagues joined"), "");
        assert_eq!(parse_time("met at 5"), "05:00");
    }

    #[test]
    fn test_parse_time_is_total() {
        let shape = Regex::new(r"^$|^\d{2}:\d{2}$").unwrap();
        for input in [
            "",
            "9",
            "99:99",
            "morning at 77",
            "¡time!",
            "noon 12:30 pm maybe",
            "at 0",
        ] {
            let out = parse_time(input);
            assert!(shape.is_match(&out), "input {:?} gave {:?}", input, out);
        }
    }
}
