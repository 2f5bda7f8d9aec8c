//! Priority phrase extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::WorkingText;
use crate::task::Priority;

static RE_HIGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:with )?high priority|urgent|very important").unwrap());

static RE_MEDIUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:with )?medium priority").unwrap());

static RE_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:with )?low priority").unwrap());

/// Detect an explicit priority phrase in the working text.
///
/// Precedence is fixed: any high-priority phrase wins over "medium
/// priority", which wins over "low priority". On a match, every phrase
/// variant for that level is removed from the working text, catching
/// redundant phrasing like "with high priority" and "urgent" co-occurring.
/// No match leaves the text untouched and returns `None`.
pub fn extract(text: &mut WorkingText) -> Option<Priority> {
    let lower = text.working().to_lowercase();

    let (level, strip) = if lower.contains("high priority")
        || lower.contains("urgent")
        || lower.contains("very important")
    {
        (Priority::High, &*RE_HIGH)
    } else if lower.contains("medium priority") {
        (Priority::Medium, &*RE_MEDIUM)
    } else if lower.contains("low priority") {
        (Priority::Low, &*RE_LOW)
    } else {
        return None;
    };

    let cleaned = strip.replace_all(text.working(), "").to_string();
    text.set_working(cleaned.trim());
    Some(level)
}
