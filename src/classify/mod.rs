//! Optional statistical fallback classifiers.
//!
//! When the rule stages find no priority or category in a command, the
//! parser can consult small pre-trained text classifiers. Artifacts are
//! JSON multinomial naive-Bayes models over lowercase word tokens, probed
//! by filename in the models directory at startup. Absence of an artifact
//! is a normal operating condition: it only disables the fallback for that
//! field, never the parser itself.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// Result type for classifier operations.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;

/// Artifact filename for the priority fallback model.
pub const PRIORITY_MODEL_FILE: &str = "priority_model.json";
/// Artifact filename for the category fallback model.
pub const CATEGORY_MODEL_FILE: &str = "category_model.json";
/// Artifact filename for the diagnostics-only intent model.
pub const INTENT_MODEL_FILE: &str = "intent_model.json";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A multinomial naive-Bayes text classifier over lowercase word tokens.
///
/// Immutable after construction; safe to share behind an `Arc` across
/// concurrent parser calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClassifier {
    /// Class labels, in score-table order.
    classes: Vec<String>,
    /// Log prior per class.
    class_log_prior: Vec<f64>,
    /// Per-token log likelihood, one entry per class.
    token_log_prob: HashMap<String, Vec<f64>>,
    /// Log likelihood per class for out-of-vocabulary tokens.
    unseen_log_prob: Vec<f64>,
}

impl TextClassifier {
    /// Build a classifier from raw tables. Used by tests and model-export
    /// tooling; artifacts on disk go through [`TextClassifier::load`].
    pub fn new(
        classes: Vec<String>,
        class_log_prior: Vec<f64>,
        token_log_prob: HashMap<String, Vec<f64>>,
        unseen_log_prob: Vec<f64>,
    ) -> Self {
        Self {
            classes,
            class_log_prior,
            token_log_prob,
            unseen_log_prob,
        }
    }

    /// Load and validate a JSON model artifact.
    pub fn load(path: &Path) -> ClassifyResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ClassifyError::MalformedModel {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let model: Self =
            serde_json::from_str(&raw).map_err(|e| ClassifyError::MalformedModel {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        model.validate()?;
        Ok(model)
    }

    /// Check that every per-class table has exactly one entry per class.
    pub fn validate(&self) -> ClassifyResult<()> {
        let n = self.classes.len();
        if n == 0 {
            return Err(ClassifyError::EmptyModel);
        }
        if self.class_log_prior.len() != n {
            return Err(ClassifyError::TableMismatch {
                table: "class_log_prior",
                expected: n,
                actual: self.class_log_prior.len(),
            });
        }
        if self.unseen_log_prob.len() != n {
            return Err(ClassifyError::TableMismatch {
                table: "unseen_log_prob",
                expected: n,
                actual: self.unseen_log_prob.len(),
            });
        }
        for row in self.token_log_prob.values() {
            if row.len() != n {
                return Err(ClassifyError::TableMismatch {
                    table: "token_log_prob",
                    expected: n,
                    actual: row.len(),
                });
            }
        }
        Ok(())
    }

    /// Class labels in table order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Predict the most likely class label for `text`.
    ///
    /// Scores are summed log probabilities; out-of-vocabulary tokens use the
    /// per-class unseen likelihood. Ties break toward the earlier class.
    /// Empty input falls back to the prior alone.
    pub fn predict(&self, text: &str) -> ClassifyResult<&str> {
        self.validate()?;

        let mut scores = self.class_log_prior.clone();
        for token in tokenize(text) {
            let row = self
                .token_log_prob
                .get(&token)
                .unwrap_or(&self.unseen_log_prob);
            for (score, p) in scores.iter_mut().zip(row) {
                *score += p;
            }
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        Ok(&self.classes[best])
    }
}

/// Lowercase alphanumeric word tokens of `text`.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

// ---------------------------------------------------------------------------
// Fallback invocation outcome
// ---------------------------------------------------------------------------

/// Outcome of one fallback-classifier consultation.
///
/// The parser records this per field so the "failure was swallowed" branch
/// is observable in tests instead of hiding behind suppressed errors.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    /// The rule stage already found a value; the model was not consulted.
    RuleMatched,
    /// No model is loaded for this field.
    Unavailable,
    /// The model predicted a label and it was applied.
    Applied { label: String },
    /// The model predicted a label the field cannot use; the rule-derived
    /// value was kept.
    Rejected { label: String },
    /// Prediction failed; the failure was swallowed and the field kept its
    /// rule-derived value.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Best-effort loading
// ---------------------------------------------------------------------------

/// The set of optional fallback models.
///
/// `intent` is loaded for request diagnostics only; it never influences
/// parsing.
#[derive(Debug, Clone, Default)]
pub struct FallbackModels {
    pub priority: Option<Arc<TextClassifier>>,
    pub category: Option<Arc<TextClassifier>>,
    pub intent: Option<Arc<TextClassifier>>,
}

impl FallbackModels {
    /// Load whatever artifacts exist under `models_dir`.
    ///
    /// Missing or malformed files disable that fallback and are logged;
    /// loading itself never fails.
    pub fn load(models_dir: &Path) -> Self {
        Self {
            priority: load_optional(&models_dir.join(PRIORITY_MODEL_FILE)),
            category: load_optional(&models_dir.join(CATEGORY_MODEL_FILE)),
            intent: load_optional(&models_dir.join(INTENT_MODEL_FILE)),
        }
    }
}

fn load_optional(path: &Path) -> Option<Arc<TextClassifier>> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "classifier artifact absent");
        return None;
    }
    match TextClassifier::load(path) {
        Ok(model) => {
            tracing::info!(
                path = %path.display(),
                classes = model.classes.len(),
                "loaded classifier model"
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unloadable classifier model");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
