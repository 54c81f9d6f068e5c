use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::assessment::domain::{
    Actor, AnswerOption, AnswerOptionId, Category, CategoryId, FormDefinition, FormId, Question,
    QuestionId, ResponseEntry, Role, UserAccount, UserId,
};
use crate::assessment::memory::{
    InMemoryFormRepository, InMemorySubmissionRepository, InMemoryUserRepository,
};
use crate::assessment::service::AssessmentService;
use crate::config::AssessmentConfig;

pub(super) type MemoryService =
    AssessmentService<InMemoryFormRepository, InMemorySubmissionRepository, InMemoryUserRepository>;

pub(super) fn admin() -> Actor {
    Actor::admin("admin-1")
}

pub(super) fn respondent() -> Actor {
    Actor::user("user-1")
}

pub(super) fn service() -> (
    MemoryService,
    Arc<InMemoryFormRepository>,
    Arc<InMemorySubmissionRepository>,
) {
    let forms = Arc::new(InMemoryFormRepository::default());
    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let service = AssessmentService::new(
        forms.clone(),
        submissions.clone(),
        Arc::new(InMemoryUserRepository::default()),
        AssessmentConfig::default(),
    );
    (service, forms, submissions)
}

/// Respondent account created at 09:00 on the given day of January 2025.
pub(super) fn account(id: &str, day: u32) -> UserAccount {
    UserAccount {
        id: UserId(id.to_string()),
        email: format!("{id}@harmony.local"),
        first_name: "Test".to_string(),
        last_name: id.to_string(),
        role: Role::User,
        is_blocked: false,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn signed_scale(question: &str) -> Vec<AnswerOption> {
    [("neg", -1), ("neutral", 0), ("pos", 1)]
        .into_iter()
        .map(|(suffix, value)| AnswerOption {
            id: AnswerOptionId(format!("{question}-{suffix}")),
            label: suffix.to_string(),
            value,
        })
        .collect()
}

/// Two categories: "Career" weighted 2 with one question, "Physical" weighted 1 with two.
pub(super) fn weighted_form() -> FormDefinition {
    FormDefinition {
        id: FormId("form-weighted".to_string()),
        title: "Weighted check-in".to_string(),
        description: None,
        is_default: false,
        is_active: true,
        created_by: UserId("admin-1".to_string()),
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 6, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        categories: vec![
            Category {
                id: CategoryId("cat-career".to_string()),
                name: "Career".to_string(),
                weight: 2.0,
                questions: vec![Question {
                    id: QuestionId("q-career".to_string()),
                    prompt: "How is work treating you?".to_string(),
                    answers: signed_scale("q-career"),
                }],
            },
            Category {
                id: CategoryId("cat-physical".to_string()),
                name: "Physical".to_string(),
                weight: 1.0,
                questions: vec![
                    Question {
                        id: QuestionId("q-sleep".to_string()),
                        prompt: "How is your sleep?".to_string(),
                        answers: signed_scale("q-sleep"),
                    },
                    Question {
                        id: QuestionId("q-energy".to_string()),
                        prompt: "How is your energy, 0 to 5?".to_string(),
                        answers: (0..=5)
                            .map(|value| AnswerOption {
                                id: AnswerOptionId(format!("q-energy-{value}")),
                                label: value.to_string(),
                                value,
                            })
                            .collect(),
                    },
                ],
            },
        ],
    }
}

pub(super) fn response(question: &str, answer: &str) -> ResponseEntry {
    ResponseEntry {
        question_id: QuestionId(question.to_string()),
        answer_option_id: AnswerOptionId(answer.to_string()),
    }
}

/// Answers for every question of the baseline form, picking the option with `value`.
pub(super) fn uniform_responses(form: &FormDefinition, value: i32) -> Vec<ResponseEntry> {
    form.categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .map(|question| {
            let answer = question
                .answers
                .iter()
                .find(|answer| answer.value == value)
                .expect("scale contains value");
            ResponseEntry {
                question_id: question.id.clone(),
                answer_option_id: answer.id.clone(),
            }
        })
        .collect()
}
