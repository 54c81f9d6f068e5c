//! Mutex-backed repositories for demos, the CLI, and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Assignment, AuditEntry, FormDefinition, FormId, SubmissionRecord, UserAccount, UserId,
};
use super::repository::{FormRepository, RepositoryError, SubmissionRepository, UserRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

#[derive(Default)]
struct FormState {
    forms: HashMap<FormId, FormDefinition>,
    assignments: HashMap<(UserId, FormId), Assignment>,
}

#[derive(Default, Clone)]
pub struct InMemoryFormRepository {
    state: Arc<Mutex<FormState>>,
}

impl FormRepository for InMemoryFormRepository {
    fn insert_form(&self, form: FormDefinition) -> Result<FormDefinition, RepositoryError> {
        let mut guard = lock(&self.state)?;
        if guard.forms.contains_key(&form.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.forms.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn update_form(&self, form: FormDefinition) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.state)?;
        if guard.forms.contains_key(&form.id) {
            guard.forms.insert(form.id.clone(), form);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_form(&self, id: &FormId) -> Result<Option<FormDefinition>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.forms.get(id).cloned())
    }

    fn list_forms(&self) -> Result<Vec<FormDefinition>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.forms.values().cloned().collect())
    }

    fn upsert_assignment(&self, assignment: Assignment) -> Result<Assignment, RepositoryError> {
        let mut guard = lock(&self.state)?;
        if !guard.forms.contains_key(&assignment.form_id) {
            return Err(RepositoryError::NotFound);
        }
        let key = (assignment.user_id.clone(), assignment.form_id.clone());
        guard.assignments.insert(key, assignment.clone());
        Ok(assignment)
    }

    fn assignments_for(&self, user: &UserId) -> Result<Vec<Assignment>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard
            .assignments
            .values()
            .filter(|assignment| &assignment.user_id == user)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemorySubmissionRepository {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn submissions_for(&self, user: &UserId) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|record| &record.user_id == user)
            .cloned()
            .collect())
    }
}

impl InMemorySubmissionRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[derive(Default)]
struct UserState {
    users: HashMap<UserId, UserAccount>,
    audit: Vec<AuditEntry>,
}

#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    state: Arc<Mutex<UserState>>,
}

impl UserRepository for InMemoryUserRepository {
    fn insert_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut guard = lock(&self.state)?;
        if guard.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn update_user(&self, user: UserAccount) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.state)?;
        match guard.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.users.get(id).cloned())
    }

    fn list_users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.users.values().cloned().collect())
    }

    fn record_audit(&self, entry: AuditEntry) -> Result<(), RepositoryError> {
        lock(&self.state)?.audit.push(entry);
        Ok(())
    }

    fn audit_log(&self) -> Result<Vec<AuditEntry>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.audit.clone())
    }
}
