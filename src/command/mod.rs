//! Natural-language task command parsing.
//!
//! Turns a free-form command like
//! `"remind me to submit HCI report with high priority by monday in school category"`
//! into a [`ParsedCommand`]: a cleaned task name, a priority, a category,
//! and an optional due date.
//!
//! The parser is a hybrid: deterministic rule stages run first, and optional
//! statistical classifiers fill in priority/category only when the rules
//! found nothing. Stages run strictly in order over one mutable
//! [`WorkingText`]; each stage both extracts a field and narrows what later
//! stages see:
//!
//! 1. scaffold stripping ([`normalize`])
//! 2. priority phrases ([`priority`])
//! 3. `in <X> category` ([`category`])
//! 4. due dates ([`due`]), including the fuzzy tail parser ([`datetime`])
//! 5. classifier fallbacks for fields the rules missed
//! 6. name finalization
//!
//! Parsing never fails: worst case the result carries the defaults and the
//! trimmed original text as the name.

pub mod datetime;

mod category;
mod due;
mod normalize;
mod priority;

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::classify::{FallbackModels, FallbackOutcome, TextClassifier};
use crate::task::Priority;

/// Category assigned when neither rules nor fallback provide one.
pub const DEFAULT_CATEGORY: &str = "general";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Structured result of parsing one command.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedCommand {
    /// Cleaned task name. Empty only when the input itself was blank.
    pub name: String,
    /// Priority level; defaults to low.
    pub priority: Priority,
    /// Category label; defaults to [`DEFAULT_CATEGORY`].
    pub category: String,
    /// Absolute due time, when one was recognized.
    pub due_date: Option<DateTime<Local>>,
}

/// Per-field provenance of one parse.
///
/// Makes the fallback path observable: tests can assert that a model was
/// never consulted, or that a prediction failure was swallowed.
#[derive(Debug, Clone)]
pub struct ParseTrace {
    pub priority_from_rules: bool,
    pub category_from_rules: bool,
    pub priority_fallback: FallbackOutcome,
    pub category_fallback: FallbackOutcome,
}

// ---------------------------------------------------------------------------
// Working text
// ---------------------------------------------------------------------------

/// The mutable string state carried between extraction stages within one
/// parse call. Owns both the pristine trimmed original (some stages read it
/// on purpose) and the shrinking working copy.
#[derive(Debug)]
pub struct WorkingText {
    original: String,
    working: String,
}

impl WorkingText {
    pub(crate) fn new(input: &str) -> Self {
        let original = input.trim().to_string();
        Self {
            working: original.clone(),
            original,
        }
    }

    /// The trimmed original input, untouched by any stage.
    pub(crate) fn original(&self) -> &str {
        &self.original
    }

    /// The current working copy.
    pub(crate) fn working(&self) -> &str {
        &self.working
    }

    pub(crate) fn set_working(&mut self, working: &str) {
        self.working = working.to_string();
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Hybrid rule + statistical command parser.
///
/// Construct once — optionally injecting fallback classifiers — and reuse.
/// Parses are independent, side-effect-free, and safe to run concurrently;
/// the models are read-only shared state.
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    priority_model: Option<Arc<TextClassifier>>,
    category_model: Option<Arc<TextClassifier>>,
}

impl CommandParser {
    /// A parser with no fallback models: rules and defaults only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser using whatever fallback models were loaded from disk.
    pub fn with_models(models: &FallbackModels) -> Self {
        Self {
            priority_model: models.priority.clone(),
            category_model: models.category.clone(),
        }
    }

    /// Inject a priority fallback model.
    pub fn with_priority_model(mut self, model: Arc<TextClassifier>) -> Self {
        self.priority_model = Some(model);
        self
    }

    /// Inject a category fallback model.
    pub fn with_category_model(mut self, model: Arc<TextClassifier>) -> Self {
        self.category_model = Some(model);
        self
    }

    /// Parse a command relative to the current wall-clock time.
    pub fn parse(&self, input: &str) -> ParsedCommand {
        self.parse_at(input, Local::now())
    }

    /// Parse a command relative to an explicit reference instant.
    ///
    /// Due dates resolve against `now`, so tests do not race the clock.
    pub fn parse_at(&self, input: &str, now: DateTime<Local>) -> ParsedCommand {
        self.parse_with_trace(input, now).0
    }

    /// Parse and report per-field provenance alongside the result.
    pub fn parse_with_trace(
        &self,
        input: &str,
        now: DateTime<Local>,
    ) -> (ParsedCommand, ParseTrace) {
        let mut text = WorkingText::new(input);

        normalize::strip_scaffolding(&mut text);
        let rule_priority = priority::extract(&mut text);
        let rule_category = category::extract(&mut text);
        let due_date = due::extract(&mut text, now);

        let mut priority = rule_priority.unwrap_or_default();
        let mut category = rule_category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let priority_fallback =
            self.priority_fallback(rule_priority.is_some(), text.original(), &mut priority);
        let category_fallback =
            self.category_fallback(rule_category.is_some(), text.original(), &mut category);

        let name = finalize_name(&text);

        (
            ParsedCommand {
                name,
                priority,
                category,
                due_date,
            },
            ParseTrace {
                priority_from_rules: rule_priority.is_some(),
                category_from_rules: rule_category.is_some(),
                priority_fallback,
                category_fallback,
            },
        )
    }

    /// Consult the priority fallback model, unless the rules already matched.
    ///
    /// Predictions run over the pristine original input. Unusable labels and
    /// prediction failures leave the priority unchanged; nothing propagates.
    fn priority_fallback(
        &self,
        rule_matched: bool,
        original: &str,
        priority: &mut Priority,
    ) -> FallbackOutcome {
        if rule_matched {
            return FallbackOutcome::RuleMatched;
        }
        let Some(model) = &self.priority_model else {
            return FallbackOutcome::Unavailable;
        };
        match model.predict(original) {
            Ok(label) => match Priority::from_label(label) {
                Some(level) => {
                    *priority = level;
                    FallbackOutcome::Applied {
                        label: label.to_string(),
                    }
                }
                None => {
                    tracing::debug!(label, "priority fallback produced an unusable label");
                    FallbackOutcome::Rejected {
                        label: label.to_string(),
                    }
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "priority fallback failed; keeping current value");
                FallbackOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Consult the category fallback model, unless the rules already matched.
    /// The predicted label is used verbatim.
    fn category_fallback(
        &self,
        rule_matched: bool,
        original: &str,
        category: &mut String,
    ) -> FallbackOutcome {
        if rule_matched {
            return FallbackOutcome::RuleMatched;
        }
        let Some(model) = &self.category_model else {
            return FallbackOutcome::Unavailable;
        };
        match model.predict(original) {
            Ok(label) => {
                *category = label.to_string();
                FallbackOutcome::Applied {
                    label: label.to_string(),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "category fallback failed; keeping current value");
                FallbackOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Collapse whitespace runs, trim, and strip trailing commas and periods.
///
/// An empty result falls back to the trimmed original input so the name is
/// never emptied by extraction alone.
fn finalize_name(text: &WorkingText) -> String {
    let collapsed = text
        .working()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = collapsed.trim_end_matches([' ', ',', '.']);
    if cleaned.is_empty() {
        text.original().to_string()
    } else {
        cleaned.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
