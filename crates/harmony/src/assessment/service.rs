use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{
    Actor, AnswerOption, AnswerOptionId, Assignment, AuditAction, AuditEntry, Category,
    CategoryId, FormDefinition, FormDraft, FormId, FormValidationError, Question, QuestionId,
    ResponseEntry, SubmissionHistory, SubmissionId, SubmissionRecord, SubmissionStats,
    UserAccount, UserId, UserOverview,
};
use super::repository::{FormRepository, RepositoryError, SubmissionRepository, UserRepository};
use super::resolver::{resolve_responses, ResolveError};
use super::scoring::{compute_score, round_to_hundredths};
use crate::config::AssessmentConfig;

/// Service composing form, submission, and user storage with the harmony-score engine.
pub struct AssessmentService<F, S, U> {
    forms: Arc<F>,
    submissions: Arc<S>,
    users: Arc<U>,
    config: AssessmentConfig,
}

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(prefix: &str) -> String {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Numeric suffix of a generated identifier; foreign ids without one rank as 0.
fn sequence_of(id: &str) -> u64 {
    id.rsplit_once('-')
        .and_then(|(_, digits)| digits.parse().ok())
        .unwrap_or(0)
}

trait Chronological {
    fn created_at(&self) -> &DateTime<Utc>;
    fn record_id(&self) -> &str;
}

impl Chronological for FormDefinition {
    fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    fn record_id(&self) -> &str {
        &self.id.0
    }
}

impl Chronological for SubmissionRecord {
    fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    fn record_id(&self) -> &str {
        &self.id.0
    }
}

impl Chronological for UserAccount {
    fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    fn record_id(&self) -> &str {
        &self.id.0
    }
}

/// Newest first; equal timestamps fall back to the id sequence so later records win.
fn sort_newest_first<T: Chronological>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.created_at()
            .cmp(a.created_at())
            .then_with(|| sequence_of(b.record_id()).cmp(&sequence_of(a.record_id())))
            .then_with(|| b.record_id().cmp(a.record_id()))
    });
}

impl<F, S, U> AssessmentService<F, S, U>
where
    F: FormRepository + 'static,
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(
        forms: Arc<F>,
        submissions: Arc<S>,
        users: Arc<U>,
        config: AssessmentConfig,
    ) -> Self {
        Self {
            forms,
            submissions,
            users,
            config,
        }
    }

    /// Validate and publish a new form. Admin only.
    pub fn create_form(
        &self,
        actor: &Actor,
        draft: FormDraft,
    ) -> Result<FormDefinition, AssessmentServiceError> {
        require_admin(actor)?;
        draft.validate()?;

        let form = FormDefinition {
            id: FormId(next_id("form")),
            title: draft.title,
            description: draft.description,
            is_default: draft.is_default,
            is_active: true,
            created_by: actor.user_id.clone(),
            created_at: Utc::now(),
            categories: draft
                .categories
                .into_iter()
                .map(|category| Category {
                    id: CategoryId(next_id("cat")),
                    name: category.name,
                    weight: category.weight,
                    questions: category
                        .questions
                        .into_iter()
                        .map(|question| Question {
                            id: QuestionId(next_id("q")),
                            prompt: question.prompt,
                            answers: question
                                .answers
                                .into_iter()
                                .map(|answer| AnswerOption {
                                    id: AnswerOptionId(next_id("ans")),
                                    label: answer.label,
                                    value: answer.value,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        };

        let stored = self.forms.insert_form(form)?;
        info!(
            form_id = %stored.id,
            categories = stored.categories.len(),
            questions = stored.question_count(),
            "assessment form created"
        );
        Ok(stored)
    }

    /// Open or close a form for new submissions. Admin only.
    pub fn set_form_active(
        &self,
        actor: &Actor,
        form_id: &FormId,
        active: bool,
    ) -> Result<FormDefinition, AssessmentServiceError> {
        require_admin(actor)?;
        let mut form = self
            .forms
            .fetch_form(form_id)?
            .ok_or_else(|| AssessmentServiceError::FormNotFound(form_id.clone()))?;

        form.is_active = active;
        self.forms.update_form(form.clone())?;
        info!(form_id = %form.id, active, "form availability changed");
        Ok(form)
    }

    /// Grant a user access to a form, reactivating a previous assignment. Admin only.
    pub fn assign_form(
        &self,
        actor: &Actor,
        user_id: UserId,
        form_id: FormId,
    ) -> Result<Assignment, AssessmentServiceError> {
        require_admin(actor)?;
        if self.forms.fetch_form(&form_id)?.is_none() {
            return Err(AssessmentServiceError::FormNotFound(form_id));
        }

        let assignment = self.forms.upsert_assignment(Assignment {
            user_id,
            form_id,
            active: true,
        })?;
        info!(
            user_id = %assignment.user_id,
            form_id = %assignment.form_id,
            "form assigned"
        );
        Ok(assignment)
    }

    /// Active forms the user may take: default forms plus active assignments, newest first.
    pub fn assigned_forms(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FormDefinition>, AssessmentServiceError> {
        let assigned: HashSet<FormId> = self
            .forms
            .assignments_for(user_id)?
            .into_iter()
            .filter(|assignment| assignment.active)
            .map(|assignment| assignment.form_id)
            .collect();

        let mut forms: Vec<FormDefinition> = self
            .forms
            .list_forms()?
            .into_iter()
            .filter(|form| form.is_active && (form.is_default || assigned.contains(&form.id)))
            .collect();
        sort_newest_first(&mut forms);
        Ok(forms)
    }

    /// Fetch a form, enforcing that non-admins only see default or assigned forms.
    pub fn form_for(
        &self,
        actor: &Actor,
        form_id: &FormId,
    ) -> Result<FormDefinition, AssessmentServiceError> {
        let form = self
            .forms
            .fetch_form(form_id)?
            .ok_or_else(|| AssessmentServiceError::FormNotFound(form_id.clone()))?;

        if actor.is_admin() || form.is_default {
            return Ok(form);
        }

        let assigned = self
            .forms
            .assignments_for(&actor.user_id)?
            .iter()
            .any(|assignment| assignment.active && &assignment.form_id == form_id);
        if assigned {
            Ok(form)
        } else {
            Err(AssessmentServiceError::Forbidden("form not assigned"))
        }
    }

    /// Score a response set against a form and persist the snapshot.
    pub fn submit(
        &self,
        actor: &Actor,
        form_id: &FormId,
        responses: Vec<ResponseEntry>,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        // Identities without an account record are managed elsewhere and never blocked.
        if let Some(account) = self.users.fetch_user(&actor.user_id)? {
            if account.is_blocked {
                return Err(AssessmentServiceError::UserBlocked(account.id));
            }
        }
        let form = self.form_for(actor, form_id)?;
        if !form.is_active {
            return Err(AssessmentServiceError::FormInactive(form.id));
        }

        let resolved = resolve_responses(&form, &responses)?;
        let score = compute_score(&resolved.score_inputs());
        debug!(
            form_id = %form.id,
            answers = resolved.answers.len(),
            total_score = score.total_score,
            "responses resolved"
        );

        let record = SubmissionRecord {
            id: SubmissionId(next_id("sub")),
            user_id: actor.user_id.clone(),
            form_id: form.id,
            total_score: score.total_score,
            normalized_score: score.normalized_score,
            label: score.label,
            responses,
            category_scores: resolved.category_scores(),
            created_at: Utc::now(),
        };

        let stored = self.submissions.insert_submission(record)?;
        info!(
            submission_id = %stored.id,
            user_id = %stored.user_id,
            normalized_score = stored.normalized_score,
            label = %stored.label,
            "submission scored"
        );
        Ok(stored)
    }

    /// The user's most recent submissions plus aggregate stats over all of them.
    pub fn history(&self, user_id: &UserId) -> Result<SubmissionHistory, AssessmentServiceError> {
        let mut submissions = self.submissions.submissions_for(user_id)?;
        let stats = submission_stats(&submissions);

        sort_newest_first(&mut submissions);
        submissions.truncate(self.config.history_limit);

        Ok(SubmissionHistory { submissions, stats })
    }

    /// Store a new account. Sign-up and credentials live with the authentication layer.
    pub fn register_user(
        &self,
        account: UserAccount,
    ) -> Result<UserAccount, AssessmentServiceError> {
        let stored = self.users.insert_user(account)?;
        debug!(user_id = %stored.id, role = ?stored.role, "user registered");
        Ok(stored)
    }

    /// Block or unblock a user and append the matching audit entry. Admin only.
    pub fn set_user_blocked(
        &self,
        actor: &Actor,
        user_id: &UserId,
        blocked: bool,
    ) -> Result<UserAccount, AssessmentServiceError> {
        require_admin(actor)?;
        let mut account = self
            .users
            .fetch_user(user_id)?
            .ok_or_else(|| AssessmentServiceError::UserNotFound(user_id.clone()))?;

        account.is_blocked = blocked;
        self.users.update_user(account.clone())?;

        let entry = AuditEntry {
            action: AuditAction::for_block(blocked),
            target: account.id.clone(),
            actor: actor.user_id.clone(),
            at: Utc::now(),
        };
        self.users.record_audit(entry)?;
        info!(
            user_id = %account.id,
            actor_id = %actor.user_id,
            blocked,
            "user block status changed"
        );
        Ok(account)
    }

    /// Every account, newest first, with all of its submissions. Admin only.
    pub fn list_users_with_submissions(
        &self,
        actor: &Actor,
    ) -> Result<Vec<UserOverview>, AssessmentServiceError> {
        require_admin(actor)?;
        let mut users = self.users.list_users()?;
        sort_newest_first(&mut users);

        let mut overview = Vec::with_capacity(users.len());
        for user in users {
            let mut submissions = self.submissions.submissions_for(&user.id)?;
            sort_newest_first(&mut submissions);
            overview.push(UserOverview { user, submissions });
        }
        Ok(overview)
    }

    /// Administrative actions in the order they happened. Admin only.
    pub fn audit_log(&self, actor: &Actor) -> Result<Vec<AuditEntry>, AssessmentServiceError> {
        require_admin(actor)?;
        Ok(self.users.audit_log()?)
    }
}

/// Mean normalized score rounded to hundredths; zero for an empty history.
pub fn submission_stats(submissions: &[SubmissionRecord]) -> SubmissionStats {
    let total_submissions = submissions.len();
    let average_score = if total_submissions == 0 {
        0.0
    } else {
        let sum: f64 = submissions
            .iter()
            .map(|record| record.normalized_score)
            .sum();
        round_to_hundredths(sum / total_submissions as f64)
    };

    SubmissionStats {
        average_score,
        total_submissions,
    }
}

fn require_admin(actor: &Actor) -> Result<(), AssessmentServiceError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AssessmentServiceError::Forbidden("admin role required"))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("form {0} not found")]
    FormNotFound(FormId),
    #[error("form {0} is not accepting submissions")]
    FormInactive(FormId),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("user {0} is blocked")]
    UserBlocked(UserId),
    #[error(transparent)]
    Validation(#[from] FormValidationError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
