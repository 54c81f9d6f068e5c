use crate::infra::parse_answer_value;
use clap::Args;
use harmony::assessment::baseline::BASELINE_CATEGORIES;
use harmony::assessment::{
    baseline_form_draft, Actor, AssessmentService, FormDefinition, InMemoryFormRepository,
    InMemorySubmissionRepository, InMemoryUserRepository, ResponseEntry,
};
use harmony::config::AssessmentConfig;
use harmony::error::AppError;
use std::sync::Arc;

const DEFAULT_ANSWERS: [i32; 9] = [1, 1, 0, 1, -1, 0, 1, 1, 0];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Comma-separated answers on the -1 / 0 / +1 scale, one per baseline category
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_parser = parse_answer_value
    )]
    pub(crate) answers: Option<Vec<i32>>,
}

pub(crate) fn run_demo(args: DemoArgs, config: AssessmentConfig) -> Result<(), AppError> {
    let answers = args.answers.unwrap_or_else(|| DEFAULT_ANSWERS.to_vec());
    if answers.is_empty() || answers.len() > BASELINE_CATEGORIES.len() {
        return Err(AppError::InvalidArgument(format!(
            "expected between 1 and {} answers, got {}",
            BASELINE_CATEGORIES.len(),
            answers.len()
        )));
    }

    let service = AssessmentService::new(
        Arc::new(InMemoryFormRepository::default()),
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(InMemoryUserRepository::default()),
        config,
    );
    let admin = Actor::admin("admin@harmony.local");
    let patient = Actor::user("user@harmony.local");

    println!("Harmony assessment demo");
    let form = service.create_form(&admin, baseline_form_draft())?;
    println!(
        "Seeded '{}' ({} categories, {} questions)",
        form.title,
        form.categories.len(),
        form.question_count()
    );

    let record = service.submit(&patient, &form.id, responses_for(&form, &answers))?;
    println!(
        "\nSubmission {} at {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Total score:      {}", record.total_score);
    println!("  Normalized score: {:.2}", record.normalized_score);
    println!("  Label:            {}", record.label);

    println!("\nCategory breakdown");
    for (name, score) in &record.category_scores {
        println!(
            "  {:<24} weighted {:>5} | raw {:>3} | answers {}",
            name, score.weighted, score.raw, score.count
        );
    }

    let history = service.history(&patient.user_id)?;
    println!(
        "\nHistory for {}: {} submission(s), average score {:.2}",
        patient.user_id, history.stats.total_submissions, history.stats.average_score
    );

    Ok(())
}

/// Maps positional answers onto the form's questions in category order.
fn responses_for(form: &FormDefinition, answers: &[i32]) -> Vec<ResponseEntry> {
    form.categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .zip(answers)
        .filter_map(|(question, value)| {
            question
                .answers
                .iter()
                .find(|option| option.value == *value)
                .map(|option| ResponseEntry {
                    question_id: question.id.clone(),
                    answer_option_id: option.id.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_answers_cover_every_baseline_category() {
        assert_eq!(DEFAULT_ANSWERS.len(), BASELINE_CATEGORIES.len());
    }

    #[test]
    fn rejects_too_many_answers() {
        let args = DemoArgs {
            answers: Some(vec![0; BASELINE_CATEGORIES.len() + 1]),
        };
        assert!(matches!(
            run_demo(args, AssessmentConfig::default()),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn runs_with_default_answers() {
        run_demo(DemoArgs::default(), AssessmentConfig::default()).expect("demo completes");
    }
}
