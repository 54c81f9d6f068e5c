use super::domain::{AnswerDraft, CategoryDraft, FormDraft, QuestionDraft};

pub const BASELINE_TITLE: &str = "Harmony Baseline Assessment";

/// Life areas covered by the baseline assessment, in presentation order.
pub const BASELINE_CATEGORIES: [&str; 9] = [
    "Family/Love",
    "Financial",
    "Community/Social",
    "Career",
    "Emotional",
    "Spiritual",
    "Intellectual/Creative",
    "Physical",
    "Environmental",
];

/// Default form: one -1 / 0 / +1 question per life area, every category weighted 1.
pub fn baseline_form_draft() -> FormDraft {
    FormDraft {
        title: BASELINE_TITLE.to_string(),
        description: Some("Rank impact between categories using -1 / 0 / +1 scoring.".to_string()),
        is_default: true,
        categories: BASELINE_CATEGORIES
            .iter()
            .map(|name| CategoryDraft {
                name: (*name).to_string(),
                weight: 1.0,
                questions: vec![QuestionDraft {
                    prompt: format!("How is {name} currently affecting your overall well-being?"),
                    answers: impact_scale(),
                }],
            })
            .collect(),
    }
}

fn impact_scale() -> Vec<AnswerDraft> {
    [
        ("Negatively affects", -1),
        ("No affect", 0),
        ("Positively affects", 1),
    ]
    .into_iter()
    .map(|(label, value)| AnswerDraft {
        label: label.to_string(),
        value,
    })
    .collect()
}
