//! End-to-end scenarios through the public assessment service facade.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use harmony::assessment::{
    baseline_form_draft, Actor, AssessmentService, AssessmentServiceError, AuditAction,
    FormDefinition, HarmonyLabel, InMemoryFormRepository, InMemorySubmissionRepository,
    InMemoryUserRepository, ResponseEntry, Role, UserAccount, UserId,
};
use harmony::config::AssessmentConfig;

type MemoryService =
    AssessmentService<InMemoryFormRepository, InMemorySubmissionRepository, InMemoryUserRepository>;

fn service_with_limit(history_limit: usize) -> MemoryService {
    AssessmentService::new(
        Arc::new(InMemoryFormRepository::default()),
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(InMemoryUserRepository::default()),
        AssessmentConfig { history_limit },
    )
}

/// Picks, per question, the option whose value matches the next entry in `values`.
fn answer_with(form: &FormDefinition, values: &[i32]) -> Vec<ResponseEntry> {
    form.categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .zip(values)
        .map(|(question, value)| {
            let option = question
                .answers
                .iter()
                .find(|option| option.value == *value)
                .expect("baseline scale offers value");
            ResponseEntry {
                question_id: question.id.clone(),
                answer_option_id: option.id.clone(),
            }
        })
        .collect()
}

#[test]
fn respondent_completes_the_baseline_assessment() {
    let service = service_with_limit(50);
    let admin = Actor::admin("admin@harmony.local");
    let patient = Actor::user("user@harmony.local");

    let form = service
        .create_form(&admin, baseline_form_draft())
        .expect("admin seeds baseline");

    let available = service
        .assigned_forms(&patient.user_id)
        .expect("lists forms");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, form.id);

    // Seven positives, one neutral, one negative: total 6 of a possible 9.
    let responses = answer_with(&form, &[1, 1, 1, 1, 1, 1, 1, 0, -1]);
    let record = service
        .submit(&patient, &form.id, responses.clone())
        .expect("submission scored");

    assert_eq!(record.total_score, 6.0);
    assert_eq!(record.normalized_score, 66.67);
    assert_eq!(record.label, HarmonyLabel::Moderate);
    assert_eq!(record.responses, responses);
    assert_eq!(record.category_scores["Environmental"].weighted, -1.0);
    assert_eq!(record.category_scores["Physical"].weighted, 0.0);

    let history = service.history(&patient.user_id).expect("history");
    assert_eq!(history.stats.total_submissions, 1);
    assert_eq!(history.stats.average_score, 66.67);
}

#[test]
fn history_limit_truncates_list_but_not_stats() {
    let service = service_with_limit(2);
    let admin = Actor::admin("admin");
    let patient = Actor::user("patient");
    let form = service
        .create_form(&admin, baseline_form_draft())
        .expect("form created");

    for values in [[1; 9], [0; 9], [1; 9]] {
        service
            .submit(&patient, &form.id, answer_with(&form, &values))
            .expect("submission scored");
    }

    let history = service.history(&patient.user_id).expect("history");
    assert_eq!(history.submissions.len(), 2);
    assert_eq!(history.stats.total_submissions, 3);
    assert_eq!(history.stats.average_score, 66.67);
}

#[test]
fn concurrent_submissions_are_all_recorded() {
    let service = Arc::new(service_with_limit(100));
    let form = service
        .create_form(&Actor::admin("admin"), baseline_form_draft())
        .expect("form created");

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            let form = form.clone();
            thread::spawn(move || {
                let patient = Actor::user(format!("patient-{}", worker % 2));
                service
                    .submit(&patient, &form.id, answer_with(&form, &[1; 9]))
                    .expect("submission scored")
            })
        })
        .collect();

    for handle in handles {
        let record = handle.join().expect("worker completes");
        assert_eq!(record.normalized_score, 100.0);
    }

    let even = service
        .history(&Actor::user("patient-0").user_id)
        .expect("history");
    let odd = service
        .history(&Actor::user("patient-1").user_id)
        .expect("history");
    assert_eq!(even.stats.total_submissions, 4);
    assert_eq!(odd.stats.total_submissions, 4);
}

#[test]
fn validation_errors_surface_as_client_errors() {
    let service = service_with_limit(10);
    let form = service
        .create_form(&Actor::admin("admin"), baseline_form_draft())
        .expect("form created");

    let err = service
        .submit(&Actor::user("patient"), &form.id, Vec::new())
        .expect_err("empty payload rejected");
    assert!(matches!(err, AssessmentServiceError::Resolve(_)));
    assert!(harmony::error::AppError::from(err).is_client_error());
}

#[test]
fn blocked_respondent_is_locked_out_until_unblocked() {
    let service = service_with_limit(10);
    let admin = Actor::admin("admin@harmony.local");
    let patient = Actor::user("user@harmony.local");
    service
        .register_user(UserAccount {
            id: patient.user_id.clone(),
            email: "user@harmony.local".to_string(),
            first_name: "Harmony".to_string(),
            last_name: "User".to_string(),
            role: Role::User,
            is_blocked: false,
            created_at: Utc::now(),
        })
        .expect("account stored");
    let form = service
        .create_form(&admin, baseline_form_draft())
        .expect("form created");

    service
        .submit(&patient, &form.id, answer_with(&form, &[1; 9]))
        .expect("first submission scored");

    service
        .set_user_blocked(&admin, &patient.user_id, true)
        .expect("admin blocks user");
    let err = service
        .submit(&patient, &form.id, answer_with(&form, &[0; 9]))
        .expect_err("blocked user refused");
    assert!(matches!(err, AssessmentServiceError::UserBlocked(ref id) if id == &patient.user_id));

    service
        .set_user_blocked(&admin, &patient.user_id, false)
        .expect("admin unblocks user");
    service
        .submit(&patient, &form.id, answer_with(&form, &[0; 9]))
        .expect("submission accepted again");

    let overview = service
        .list_users_with_submissions(&admin)
        .expect("admin lists users");
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].user.id, UserId("user@harmony.local".to_string()));
    assert!(!overview[0].user.is_blocked);
    assert_eq!(overview[0].submissions.len(), 2);

    let actions: Vec<AuditAction> = service
        .audit_log(&admin)
        .expect("audit log")
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec![AuditAction::BlockUser, AuditAction::UnblockUser]);
}
