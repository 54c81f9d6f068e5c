use super::domain::{
    Assignment, AuditEntry, FormDefinition, FormId, SubmissionRecord, UserAccount, UserId,
};

/// Storage abstraction for forms and their assignments.
pub trait FormRepository: Send + Sync {
    fn insert_form(&self, form: FormDefinition) -> Result<FormDefinition, RepositoryError>;
    fn update_form(&self, form: FormDefinition) -> Result<(), RepositoryError>;
    fn fetch_form(&self, id: &FormId) -> Result<Option<FormDefinition>, RepositoryError>;
    fn list_forms(&self) -> Result<Vec<FormDefinition>, RepositoryError>;
    /// Creates the assignment or reactivates an existing one for the same user and form.
    fn upsert_assignment(&self, assignment: Assignment) -> Result<Assignment, RepositoryError>;
    fn assignments_for(&self, user: &UserId) -> Result<Vec<Assignment>, RepositoryError>;
}

/// Storage abstraction for scored submissions.
pub trait SubmissionRepository: Send + Sync {
    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError>;
    fn submissions_for(&self, user: &UserId) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Storage abstraction for user accounts and the administrative audit trail.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError>;
    fn update_user(&self, user: UserAccount) -> Result<(), RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError>;
    fn list_users(&self) -> Result<Vec<UserAccount>, RepositoryError>;
    fn record_audit(&self, entry: AuditEntry) -> Result<(), RepositoryError>;
    /// Entries in the order they were recorded.
    fn audit_log(&self) -> Result<Vec<AuditEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
