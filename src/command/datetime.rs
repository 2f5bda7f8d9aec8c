//! Bounded fuzzy parsing of natural-language date phrases.
//!
//! Resolves the free-form tail of a "by <phrase>" clause: weekday names
//! (optionally "next"-qualified), written month dates, numeric dates, and
//! optional clock times, tolerant of surrounding words. This is a small
//! linear-scan grammar over short human-typed phrases, not a general
//! calendar parser.
//!
//! Resolution rules:
//! - A bare weekday resolves to its next occurrence on or after today;
//!   "next <weekday>" lands strictly after today.
//! - A date without an explicit clock time keeps the current time-of-day.
//! - A clock time without a date resolves to today at that time.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use regex::Regex;

// ── Regex patterns ──────────────────────────────────────────────────────

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s*(\d{{4}}))?\b"
    ))
    .unwrap()
});

static RE_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})\b(?:,?\s*(\d{{4}}))?"
    ))
    .unwrap()
});

static RE_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").unwrap());

static RE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(\d{1,2})(?::(\d{2}))?\s*([ap])\.?m\.?|(\d{1,2}):(\d{2}))\b").unwrap()
});

// ── Entry point ─────────────────────────────────────────────────────────

/// Attempt to resolve `phrase` to an absolute time, relative to `now`.
///
/// Returns `None` when no date or time anchor is recognized; malformed
/// calendar dates (e.g. "february 30") also fail silently.
pub fn parse_fuzzy(phrase: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let date = find_date(phrase, now);
    let time = find_clock_time(phrase);

    match (date, time) {
        (Some(date), Some(time)) => compose(date, time),
        (Some(date), None) => compose(date, now.time()),
        (None, Some(time)) => compose(now.date_naive(), time),
        (None, None) => None,
    }
}

fn compose(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    // `earliest` resolves DST folds; a gap (no valid local time) fails the parse.
    date.and_time(time).and_local_timezone(Local).earliest()
}

// ── Date anchors ────────────────────────────────────────────────────────

/// Find the first recognizable calendar-date anchor in `phrase`.
///
/// Precedence: ISO date, written month-day (either order), numeric date,
/// weekday name.
fn find_date(phrase: &str, now: DateTime<Local>) -> Option<NaiveDate> {
    if let Some(caps) = RE_ISO.captures(phrase) {
        let y: i32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let d: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    if let Some(caps) = RE_MONTH_DAY.captures(phrase) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = caps
            .get(3)
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or_else(|| now.year());
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = RE_DAY_MONTH.captures(phrase) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = caps
            .get(3)
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or_else(|| now.year());
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = RE_NUMERIC.captures(phrase) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => {
                let raw: i32 = y.as_str().parse().ok()?;
                if y.as_str().len() == 2 { 2000 + raw } else { raw }
            }
            None => now.year(),
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = RE_WEEKDAY.captures(phrase) {
        let target = weekday_from_name(&caps[2])?;
        let next_qualified = caps.get(1).is_some();
        return Some(resolve_weekday(now.date_naive(), target, next_qualified));
    }

    None
}

/// Next occurrence of `target` on or after `today`; strictly after when
/// "next"-qualified.
fn resolve_weekday(today: NaiveDate, target: Weekday, next_qualified: bool) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    if ahead == 0 && next_qualified {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(n)
}

// ── Clock times ─────────────────────────────────────────────────────────

/// Find the first clock time ("5pm", "8:30am", "17:30") in `phrase`.
fn find_clock_time(phrase: &str) -> Option<NaiveTime> {
    let caps = RE_CLOCK.captures(phrase)?;

    if let Some(hour) = caps.get(1) {
        // 12-hour form with meridiem.
        let hour: u32 = hour.as_str().parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if hour == 0 || hour > 12 {
            return None;
        }
        let pm = caps[3].eq_ignore_ascii_case("p");
        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return NaiveTime::from_hms_opt(hour24, minute, 0);
    }

    // 24-hour hh:mm form.
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

// ── Tests ───────────────────────────────────────────────────────────────
