mod label;

pub use label::{HarmonyLabel, HIGH_HARMONY_THRESHOLD, MODERATE_HARMONY_THRESHOLD};

use serde::{Deserialize, Serialize};

/// One answered question's contribution to a harmony score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    /// Weight of the question's category; callers guarantee it is positive.
    pub category_weight: f64,
    /// Highest value among all answer options of the question.
    pub question_max: f64,
    /// Value of the option the respondent picked.
    pub selected_value: f64,
}

impl ScoreInput {
    pub const fn new(category_weight: f64, question_max: f64, selected_value: f64) -> Self {
        Self {
            category_weight,
            question_max,
            selected_value,
        }
    }

    fn weighted_value(&self) -> f64 {
        self.selected_value * self.category_weight
    }

    fn weighted_max(&self) -> f64 {
        self.question_max * self.category_weight
    }
}

/// Snapshot produced once per submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Unrounded weighted sum of selected values; may be negative.
    pub total_score: f64,
    /// Percentage of the weighted maximum, floored at zero and rounded to hundredths.
    pub normalized_score: f64,
    pub label: HarmonyLabel,
}

/// Computes the harmony score for a set of answered questions.
///
/// The weighted maximum is taken over exactly the supplied items, so the score
/// measures the respondent against the questions they answered. When that
/// maximum is zero (no items, or every weight or ceiling is zero) the
/// normalized score is `0.0`. Negative ratios floor at `0.0`; there is no
/// ceiling, so a caller passing a `question_max` below a selectable value can
/// observe scores above 100.
pub fn compute_score(items: &[ScoreInput]) -> ScoreResult {
    let (weighted_total, weighted_max) = items.iter().fold((0.0, 0.0), |(total, max), item| {
        (total + item.weighted_value(), max + item.weighted_max())
    });

    let raw = if weighted_max == 0.0 {
        0.0
    } else {
        (weighted_total / weighted_max) * 100.0
    };
    // `raw > 0.0` is false for NaN and -0.0 as well as negatives.
    let floored = if raw > 0.0 && raw.is_finite() { raw } else { 0.0 };
    let normalized_score = round_to_hundredths(floored);

    ScoreResult {
        total_score: weighted_total,
        normalized_score,
        label: HarmonyLabel::from_normalized(normalized_score),
    }
}

/// Rounds to two decimal places, ties away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    let scaled = (value * 100.0).round() / 100.0;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}
