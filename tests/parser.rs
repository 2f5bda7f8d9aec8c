//! End-to-end properties of the command parsing pipeline.
//!
//! These tests exercise the full stage chain — scaffold stripping, priority,
//! category, due dates, fallbacks, finalization — through the public parser
//! API, validating the contract the thin HTTP/CLI layers rely on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use taskling::classify::TextClassifier;
use taskling::command::{CommandParser, DEFAULT_CATEGORY};
use taskling::task::Priority;

/// Tuesday, 2026-08-04 at 10:15:30 local time.
fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, 4, 10, 15, 30).unwrap()
}

#[test]
fn scaffold_phrases_never_survive_into_the_name() {
    let parser = CommandParser::new();
    for input in [
        "please add buy milk",
        "remind me to buy milk",
        "can you add buy milk",
        "i need to buy milk",
        "ADD buy milk",
    ] {
        let parsed = parser.parse_at(input, fixed_now());
        assert_eq!(parsed.name, "buy milk", "input: {input:?}");
    }
}

#[test]
fn full_command_resolves_every_field() {
    let parser = CommandParser::new();
    let parsed = parser.parse_at(
        "remind me to submit HCI report with high priority by monday in school category",
        fixed_now(),
    );

    assert_eq!(parsed.name, "submit HCI report");
    assert_eq!(parsed.priority, Priority::High);
    assert_eq!(parsed.category, "school");
    // Next Monday after Tuesday 2026-08-04.
    assert_eq!(
        parsed.due_date.unwrap().date_naive(),
        chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    );
}

#[test]
fn by_tomorrow_tracks_the_real_clock() {
    // Property holds for whatever "now" is at test time: the due date is
    // one day out, to a few seconds of tolerance.
    let before = Local::now();
    let parsed = CommandParser::new().parse("finish homework by tomorrow");
    let after = Local::now();

    let due = parsed.due_date.expect("due date should resolve");
    assert!(due - before >= Duration::days(1) - Duration::seconds(1));
    assert!(due - after <= Duration::days(1) + Duration::seconds(5));
    assert_eq!(parsed.name, "finish homework");
}

#[test]
fn priority_precedence_is_fixed_high_over_medium() {
    let parsed = CommandParser::new().parse_at("urgent chores with medium priority", fixed_now());
    assert_eq!(parsed.priority, Priority::High);
}

#[test]
fn category_extraction_is_idempotent() {
    let parser = CommandParser::new();
    let first = parser.parse_at("add pay taxes in work category", fixed_now());
    assert_eq!(first.category, "work");
    assert_eq!(first.name, "pay taxes");

    let second = parser.parse_at(&first.name, fixed_now());
    assert_eq!(second.name, first.name);
    assert_eq!(second.category, DEFAULT_CATEGORY);
}

#[test]
fn name_never_ends_up_empty_for_nonblank_input() {
    // Every word of this input is removable scaffolding or date phrase; the
    // name falls back to the trimmed original text.
    let parsed = CommandParser::new().parse_at("please remind me to by tomorrow", fixed_now());
    assert_eq!(parsed.name, "please remind me to by tomorrow");
    assert!(parsed.due_date.is_some());
}

#[test]
fn blank_input_keeps_an_empty_name_for_the_caller_to_reject() {
    let parsed = CommandParser::new().parse_at("   ", fixed_now());
    assert_eq!(parsed.name, "");
    assert_eq!(parsed.priority, Priority::Low);
    assert_eq!(parsed.category, DEFAULT_CATEGORY);
    assert_eq!(parsed.due_date, None);
}

#[test]
fn casing_only_affects_the_name_casing() {
    let parser = CommandParser::new();
    let upper = parser.parse_at("ADD Buy Milk", fixed_now());
    let lower = parser.parse_at("add buy milk", fixed_now());

    assert_eq!(upper.name.to_lowercase(), lower.name.to_lowercase());
    assert_eq!(upper.priority, lower.priority);
    assert_eq!(upper.category, lower.category);
    assert_eq!(upper.due_date, lower.due_date);
}

#[test]
fn rule_match_suppresses_a_loaded_fallback_model() {
    // A stub priority model that always answers "high".
    let stub = Arc::new(TextClassifier::new(
        vec!["high".to_string()],
        vec![0.0],
        HashMap::new(),
        vec![0.0],
    ));
    let parser = CommandParser::new().with_priority_model(stub);

    let parsed = parser.parse_at("low priority buy milk", fixed_now());
    assert_eq!(parsed.priority, Priority::Low);
}

#[test]
fn fallback_models_fill_in_when_rules_miss() {
    let priority_stub = Arc::new(TextClassifier::new(
        vec!["high".to_string()],
        vec![0.0],
        HashMap::new(),
        vec![0.0],
    ));
    let category_stub = Arc::new(TextClassifier::new(
        vec!["errands".to_string()],
        vec![0.0],
        HashMap::new(),
        vec![0.0],
    ));
    let parser = CommandParser::new()
        .with_priority_model(priority_stub)
        .with_category_model(category_stub);

    let parsed = parser.parse_at("buy milk", fixed_now());
    assert_eq!(parsed.priority, Priority::High);
    assert_eq!(parsed.category, "errands");
}

#[test]
fn unresolved_by_phrase_is_left_in_the_name() {
    let parsed = CommandParser::new().parse_at("add sort the garage by myself", fixed_now());
    assert_eq!(parsed.due_date, None);
    assert_eq!(parsed.name, "sort the garage by myself");
}

#[test]
fn relative_keywords_resolve_by_arithmetic() {
    let parser = CommandParser::new();
    let now = fixed_now();

    let tonight = parser.parse_at("take out trash by tonight", now);
    let due = tonight.due_date.unwrap();
    assert_eq!(due.date_naive(), now.date_naive());
    assert_eq!(due.format("%H:%M:%S").to_string(), "20:00:00");

    let next_week = parser.parse_at("review draft by next week", now);
    assert_eq!(next_week.due_date.unwrap(), now + Duration::days(7));
}

#[test]
fn dangling_weekday_words_are_scrubbed_from_names() {
    // No due date derives from "monday" here (no "by", no standalone
    // keyword), but the word still disappears from the name.
    let parsed = CommandParser::new().parse_at("add monday standup notes", fixed_now());
    assert_eq!(parsed.due_date, None);
    assert_eq!(parsed.name, "standup notes");
}
