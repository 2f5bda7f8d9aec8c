//! Due-date extraction.
//!
//! Ordered precedence, first success wins:
//!
//! 1. `by <keyword>` for the closed relative-keyword set (today, tomorrow,
//!    tonight, this evening, this afternoon, next week), resolved by direct
//!    arithmetic on the current time.
//! 2. A free-form `by <phrase>` tail, handed to the fuzzy date parser.
//! 3. When either produced a date, everything from the first "by" onward is
//!    dropped from the working text so the phrase cannot leak into the name.
//! 4. Standalone "tomorrow" / "today", checked against the pristine original
//!    input — earlier stages may have already consumed the keyword from the
//!    working copy.
//! 5. An unconditional scrub of leftover weekday and relative-time words,
//!    date found or not.
//!
//! A `by <phrase>` that resolves to no date is left in place; the literal
//! "by ..." fragment may survive into the task name.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Local, Timelike};
use regex::Regex;

use super::{WorkingText, datetime};

static RE_RELATIVE_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bby\s+(today|tomorrow|tonight|this evening|this afternoon|next week)\b")
        .unwrap()
});

static RE_BY_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bby\s+(.+)$").unwrap());

static RE_BY_ONWARD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bby\b.*$").unwrap());

static RE_STANDALONE_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").unwrap());

static RE_STANDALONE_TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btoday\b").unwrap());

static RE_TIME_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:tomorrow|today|tonight|this evening|this afternoon|next week|next month|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .unwrap()
});

/// Extract a due date from the working text, relative to `now`.
pub fn extract(text: &mut WorkingText, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let mut due: Option<DateTime<Local>> = None;

    // Stage 1: fixed relative keywords after "by".
    if let Some(caps) = RE_RELATIVE_BY.captures(text.working()) {
        due = Some(resolve_relative(&caps[1].to_lowercase(), now));
        let cleaned = RE_RELATIVE_BY.replace(text.working(), "").to_string();
        text.set_working(cleaned.trim());
    }

    // Stage 2: free-form "by <phrase>" tail through the fuzzy parser.
    if due.is_none() {
        if let Some(caps) = RE_BY_TAIL.captures(text.working()) {
            due = datetime::parse_fuzzy(caps[1].trim(), now);
        }
    }

    // Stage 3: a resolved date drops the whole tail from "by" onward.
    if due.is_some() {
        let cleaned = RE_BY_ONWARD.replace(text.working(), "").to_string();
        text.set_working(cleaned.trim());
    }

    // Stage 4: standalone keywords against the pristine original input.
    if due.is_none() {
        if RE_STANDALONE_TOMORROW.is_match(text.original()) {
            due = Some(now + Duration::days(1));
        } else if RE_STANDALONE_TODAY.is_match(text.original()) {
            due = Some(now);
        }
    }

    // Stage 5: scrub leftover time words so they never dangle in the name.
    let scrubbed = RE_TIME_WORDS.replace_all(text.working(), "").to_string();
    text.set_working(scrubbed.trim());

    due
}

/// Resolve one of the closed relative keywords against `now`.
fn resolve_relative(keyword: &str, now: DateTime<Local>) -> DateTime<Local> {
    match keyword {
        "today" => now,
        "tomorrow" => now + Duration::days(1),
        "tonight" | "this evening" => at_hour(now, 20),
        "this afternoon" => at_hour(now, 15),
        "next week" => now + Duration::weeks(1),
        // The regex admits nothing else.
        _ => now,
    }
}

/// Same calendar day at `hour`:00:00.000.
fn at_hour(now: DateTime<Local>, hour: u32) -> DateTime<Local> {
    now.with_hour(hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}
