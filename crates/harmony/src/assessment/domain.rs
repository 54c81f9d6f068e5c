use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::HarmonyLabel;

/// Identifier wrapper for assessment forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerOptionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

macro_rules! display_id {
    ($($ty:ty),+) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(FormId, CategoryId, QuestionId, AnswerOptionId, UserId, SubmissionId);

/// Role handed in by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

/// Caller identity for service operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(id.into()),
            role: Role::User,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(id.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A published assessment with its weighted categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: FormId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<Category>,
}

fn active_by_default() -> bool {
    true
}

impl FormDefinition {
    /// Locates a question together with the category that owns it.
    pub fn question(&self, id: &QuestionId) -> Option<(&Category, &Question)> {
        self.categories.iter().find_map(|category| {
            category
                .questions
                .iter()
                .find(|question| &question.id == id)
                .map(|question| (category, question))
        })
    }

    pub fn question_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.questions.len())
            .sum()
    }
}

/// Weighted grouping of questions; the weight applies to every question inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub weight: f64,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    /// Highest value among all of this question's options, independent of what was picked.
    pub fn max_value(&self) -> Option<i32> {
        self.answers.iter().map(|answer| answer.value).max()
    }

    pub fn answer(&self, id: &AnswerOptionId) -> Option<&AnswerOption> {
        self.answers.iter().find(|answer| &answer.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: AnswerOptionId,
    pub label: String,
    pub value: i32,
}

/// Creation payload for a new form; identifiers are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub categories: Vec<CategoryDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub weight: f64,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub prompt: String,
    pub answers: Vec<AnswerDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDraft {
    pub label: String,
    pub value: i32,
}

/// Structural problems that make a draft unscoreable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormValidationError {
    #[error("form title must not be blank")]
    BlankTitle,
    #[error("form must define at least one category")]
    NoCategories,
    #[error("category '{category}' weight must be positive and finite (found {weight})")]
    InvalidWeight { category: String, weight: f64 },
    #[error("category '{category}' must define at least one question")]
    EmptyCategory { category: String },
    #[error("question '{prompt}' in category '{category}' must define at least one answer option")]
    QuestionWithoutAnswers { category: String, prompt: String },
}

impl FormDraft {
    pub fn validate(&self) -> Result<(), FormValidationError> {
        if self.title.trim().is_empty() {
            return Err(FormValidationError::BlankTitle);
        }
        if self.categories.is_empty() {
            return Err(FormValidationError::NoCategories);
        }

        for category in &self.categories {
            if !(category.weight.is_finite() && category.weight > 0.0) {
                return Err(FormValidationError::InvalidWeight {
                    category: category.name.clone(),
                    weight: category.weight,
                });
            }
            if category.questions.is_empty() {
                return Err(FormValidationError::EmptyCategory {
                    category: category.name.clone(),
                });
            }
            if let Some(question) = category
                .questions
                .iter()
                .find(|question| question.answers.is_empty())
            {
                return Err(FormValidationError::QuestionWithoutAnswers {
                    category: category.name.clone(),
                    prompt: question.prompt.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Grants a user access to a non-default form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub user_id: UserId,
    pub form_id: FormId,
    pub active: bool,
}

/// One selected answer as submitted by a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    pub question_id: QuestionId,
    pub answer_option_id: AnswerOptionId,
}

/// Per-category aggregate stored alongside a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Sum of `value * category weight`.
    pub weighted: f64,
    /// Sum of raw answer values.
    pub raw: f64,
    pub count: u32,
}

/// Persisted snapshot of a scored submission, including the raw selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub form_id: FormId,
    pub total_score: f64,
    pub normalized_score: f64,
    pub label: HarmonyLabel,
    pub responses: Vec<ResponseEntry>,
    pub category_scores: BTreeMap<String, CategoryScore>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate view over a user's submissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    /// Mean normalized score, rounded to hundredths; zero without submissions.
    pub average_score: f64,
    pub total_submissions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHistory {
    pub submissions: Vec<SubmissionRecord>,
    pub stats: SubmissionStats,
}

/// Respondent or administrator account as managed by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Blocked users keep their history but cannot submit.
    #[serde(default)]
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    BlockUser,
    UnblockUser,
}

impl AuditAction {
    pub const fn for_block(blocked: bool) -> Self {
        if blocked {
            Self::BlockUser
        } else {
            Self::UnblockUser
        }
    }
}

/// Administrative action recorded against a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: AuditAction,
    pub target: UserId,
    pub actor: UserId,
    pub at: DateTime<Utc>,
}

/// Admin listing row: the account together with everything it has submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    #[serde(flatten)]
    pub user: UserAccount,
    pub submissions: Vec<SubmissionRecord>,
}
