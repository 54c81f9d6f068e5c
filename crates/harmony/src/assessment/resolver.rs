use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerOptionId, CategoryScore, FormDefinition, FormId, QuestionId, ResponseEntry,
};
use super::scoring::{compute_score, ScoreInput, ScoreResult};

/// Reasons a response payload cannot be scored against a form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("submission must contain at least one response")]
    EmptyResponses,
    #[error("question {question} is not part of form {form}")]
    UnknownQuestion { form: FormId, question: QuestionId },
    #[error("answer option {answer} does not belong to question {question}")]
    UnknownAnswer {
        question: QuestionId,
        answer: AnswerOptionId,
    },
    #[error("question {0} was answered more than once")]
    DuplicateResponse(QuestionId),
    #[error("category {category} has weight {weight}; weights must be positive and finite")]
    InvalidWeight { category: String, weight: f64 },
}

/// A single response joined with the form data the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnswer {
    pub category: String,
    pub input: ScoreInput,
}

/// Responses resolved against a form, ready to score.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSubmission {
    pub answers: Vec<ResolvedAnswer>,
}

impl ResolvedSubmission {
    pub fn score_inputs(&self) -> Vec<ScoreInput> {
        self.answers.iter().map(|answer| answer.input).collect()
    }

    /// Sums weighted and raw values per category name.
    pub fn category_scores(&self) -> BTreeMap<String, CategoryScore> {
        let mut scores: BTreeMap<String, CategoryScore> = BTreeMap::new();
        for answer in &self.answers {
            let entry = scores.entry(answer.category.clone()).or_default();
            entry.weighted += answer.input.selected_value * answer.input.category_weight;
            entry.raw += answer.input.selected_value;
            entry.count += 1;
        }
        scores
    }
}

/// Scored view of a response set that has not been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePreview {
    pub form_id: FormId,
    #[serde(flatten)]
    pub score: ScoreResult,
    pub category_scores: BTreeMap<String, CategoryScore>,
}

/// Resolves each response to its category weight, question ceiling, and selected value.
pub fn resolve_responses(
    form: &FormDefinition,
    responses: &[ResponseEntry],
) -> Result<ResolvedSubmission, ResolveError> {
    if responses.is_empty() {
        return Err(ResolveError::EmptyResponses);
    }

    let mut seen = HashSet::with_capacity(responses.len());
    let mut answers = Vec::with_capacity(responses.len());

    for response in responses {
        let (category, question) = form.question(&response.question_id).ok_or_else(|| {
            ResolveError::UnknownQuestion {
                form: form.id.clone(),
                question: response.question_id.clone(),
            }
        })?;

        // Forms loaded from outside the service never went through draft validation.
        if !(category.weight.is_finite() && category.weight > 0.0) {
            return Err(ResolveError::InvalidWeight {
                category: category.name.clone(),
                weight: category.weight,
            });
        }

        if !seen.insert(&response.question_id) {
            return Err(ResolveError::DuplicateResponse(response.question_id.clone()));
        }

        let selected = question
            .answer(&response.answer_option_id)
            .ok_or_else(|| ResolveError::UnknownAnswer {
                question: question.id.clone(),
                answer: response.answer_option_id.clone(),
            })?;

        // A question with a selectable answer always has a maximum.
        let question_max = question.max_value().unwrap_or(selected.value);

        answers.push(ResolvedAnswer {
            category: category.name.clone(),
            input: ScoreInput::new(
                category.weight,
                f64::from(question_max),
                f64::from(selected.value),
            ),
        });
    }

    Ok(ResolvedSubmission { answers })
}

/// Resolves and scores a response set without persisting anything.
pub fn score_responses(
    form: &FormDefinition,
    responses: &[ResponseEntry],
) -> Result<ScorePreview, ResolveError> {
    let resolved = resolve_responses(form, responses)?;
    let score = compute_score(&resolved.score_inputs());

    Ok(ScorePreview {
        form_id: form.id.clone(),
        score,
        category_scores: resolved.category_scores(),
    })
}
