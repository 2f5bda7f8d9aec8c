//! Category phrase extraction: `in <words> category`.

use std::sync::LazyLock;

use regex::Regex;

use super::WorkingText;

static RE_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)in ([\w\s]+?) category").unwrap());

/// Extract an `in <words> category` phrase from the working text.
///
/// First match wins: the trimmed inner phrase becomes the category and the
/// entire matched span is removed. No match returns `None`.
pub fn extract(text: &mut WorkingText) -> Option<String> {
    let (span, category) = {
        let caps = RE_CATEGORY.captures(text.working())?;
        (caps.get(0)?.range(), caps[1].trim().to_string())
    };

    let mut remaining = text.working().to_string();
    remaining.replace_range(span, "");
    text.set_working(remaining.trim());
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (Option<String>, String) {
        let mut text = WorkingText::new(input);
        let category = extract(&mut text);
        (category, text.working().to_string())
    }

    #[test]
    fn extracts_single_word_category() {
        let (category, rest) = run("submit report in school category");
        assert_eq!(category.as_deref(), Some("school"));
        assert_eq!(rest, "submit report");
    }

    #[test]
    fn extracts_multi_word_category() {
        let (category, rest) = run("book flights in summer travel category");
        assert_eq!(category.as_deref(), Some("summer travel"));
        assert_eq!(rest, "book flights");
    }

    #[test]
    fn first_match_wins() {
        let (category, _) = run("x in work category and in home category");
        assert_eq!(category.as_deref(), Some("work"));
    }

    #[test]
    fn no_phrase_means_no_match() {
        let (category, rest) = run("buy milk");
        assert_eq!(category, None);
        assert_eq!(rest, "buy milk");
    }

    #[test]
    fn is_idempotent_over_the_remaining_text() {
        let (category, rest) = run("pay taxes in finance category");
        assert_eq!(category.as_deref(), Some("finance"));

        let (again, unchanged) = run(&rest);
        assert_eq!(again, None);
        assert_eq!(unchanged, rest);
    }
}
