//! Assessment forms, submission resolution, and harmony scoring.
//!
//! The scoring engine is a pure function; everything around it (form storage,
//! access rules, user blocking, persistence of scored snapshots) lives behind the repository
//! traits so the service can be exercised with the in-memory stores.

pub mod baseline;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod resolver;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use baseline::baseline_form_draft;
pub use domain::{
    Actor, AnswerDraft, AnswerOption, AnswerOptionId, Assignment, AuditAction, AuditEntry,
    Category, CategoryDraft, CategoryId, CategoryScore, FormDefinition, FormDraft, FormId,
    FormValidationError, Question, QuestionDraft, QuestionId, ResponseEntry, Role,
    SubmissionHistory, SubmissionId, SubmissionRecord, SubmissionStats, UserAccount, UserId,
    UserOverview,
};
pub use memory::{InMemoryFormRepository, InMemorySubmissionRepository, InMemoryUserRepository};
pub use repository::{FormRepository, RepositoryError, SubmissionRepository, UserRepository};
pub use resolver::{
    resolve_responses, score_responses, ResolveError, ResolvedAnswer, ResolvedSubmission,
    ScorePreview,
};
pub use scoring::{compute_score, round_to_hundredths, HarmonyLabel, ScoreInput, ScoreResult};
pub use service::{submission_stats, AssessmentService, AssessmentServiceError};
