//! Onboarding store — the single shared collection of employees and their
//! program instances.
//!
//! All concurrency discipline lives here: mutations take the write lock,
//! reads take the read lock, and every method sees one consistent state.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::model::{EmployeeRecord, EmployeeSummary};
use super::tracker::{TaskCompletion, apply_completion};
use crate::error::OnboardingError;

/// Backend-agnostic store for employee records.
#[async_trait]
pub trait OnboardingStore: Send + Sync {
    /// Insert an employee and its program in one step.
    async fn insert(&self, record: EmployeeRecord) -> Result<(), OnboardingError>;

    /// Insert several records atomically: either all of them land or none do.
    async fn insert_many(&self, records: Vec<EmployeeRecord>) -> Result<(), OnboardingError>;

    /// Fetch one record.
    async fn get(&self, id: Uuid) -> Result<EmployeeRecord, OnboardingError>;

    /// Progress summaries in insertion order.
    async fn list(&self) -> Result<Vec<EmployeeSummary>, OnboardingError>;

    /// Complete a task on one employee's program.
    async fn complete_task(
        &self,
        employee_id: Uuid,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TaskCompletion, OnboardingError>;

    /// Remove everything. Returns the number of employees removed.
    async fn clear_all(&self) -> Result<usize, OnboardingError>;

    /// Clone of every record, in insertion order, taken under one guard.
    async fn snapshot(&self) -> Result<Vec<EmployeeRecord>, OnboardingError>;
}

#[derive(Debug, Default)]
struct Directory {
    order: Vec<Uuid>,
    records: HashMap<Uuid, EmployeeRecord>,
}

impl Directory {
    fn check_insert(&self, record: &EmployeeRecord) -> Result<(), OnboardingError> {
        if record.employee.onboarding_program_id != record.program.id {
            return Err(OnboardingError::validation(
                "employee and program instance do not belong together",
            ));
        }
        let id = record.employee.id;
        if self.records.contains_key(&id) {
            return Err(OnboardingError::validation(format!(
                "employee {id} already exists"
            )));
        }
        Ok(())
    }

    fn push(&mut self, record: EmployeeRecord) {
        let id = record.employee.id;
        self.order.push(id);
        self.records.insert(id, record);
    }

    fn ordered(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }
}

/// In-memory store behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Directory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }
}

#[async_trait]
impl OnboardingStore for MemoryStore {
    async fn insert(&self, record: EmployeeRecord) -> Result<(), OnboardingError> {
        let id = record.employee.id;
        let mut dir = self.inner.write().await;
        dir.check_insert(&record)?;
        dir.push(record);
        debug!(employee_id = %id, total = dir.order.len(), "Employee record inserted");
        Ok(())
    }

    async fn insert_many(&self, records: Vec<EmployeeRecord>) -> Result<(), OnboardingError> {
        let mut batch_ids = HashSet::with_capacity(records.len());
        let mut dir = self.inner.write().await;
        for record in &records {
            dir.check_insert(record)?;
            if !batch_ids.insert(record.employee.id) {
                return Err(OnboardingError::validation(format!(
                    "employee {} appears twice in batch",
                    record.employee.id
                )));
            }
        }

        let count = records.len();
        for record in records {
            dir.push(record);
        }
        debug!(count, total = dir.order.len(), "Employee records inserted");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<EmployeeRecord, OnboardingError> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| OnboardingError::EmployeeNotFound { id: id.to_string() })
    }

    async fn list(&self) -> Result<Vec<EmployeeSummary>, OnboardingError> {
        let dir = self.inner.read().await;
        Ok(dir.ordered().map(EmployeeRecord::summary).collect())
    }

    async fn complete_task(
        &self,
        employee_id: Uuid,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TaskCompletion, OnboardingError> {
        let mut dir = self.inner.write().await;
        let record = dir
            .records
            .get_mut(&employee_id)
            .ok_or_else(|| OnboardingError::EmployeeNotFound {
                id: employee_id.to_string(),
            })?;
        apply_completion(record, task_id, now)
    }

    async fn clear_all(&self) -> Result<usize, OnboardingError> {
        let mut dir = self.inner.write().await;
        let removed = std::mem::take(&mut *dir);
        Ok(removed.order.len())
    }

    async fn snapshot(&self) -> Result<Vec<EmployeeRecord>, OnboardingError> {
        let dir = self.inner.read().await;
        Ok(dir.ordered().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::onboarding::catalog::ProgramCatalog;
    use crate::onboarding::model::{Employee, EmployeeStatus, ProgramInstance};

    fn record(name: &str, role: &str) -> EmployeeRecord {
        let catalog = ProgramCatalog::builtin();
        let template = catalog.get_template(role).unwrap();
        let program = ProgramInstance::from_template(template);
        EmployeeRecord {
            employee: Employee {
                id: Uuid::new_v4(),
                name: name.into(),
                email: format!("{}@bank.com", name.to_lowercase()),
                role: template.role.clone(),
                department: template.department.clone(),
                start_date: Utc::now().date_naive(),
                manager: "Lisa Park".into(),
                onboarding_program_id: program.id,
                status: EmployeeStatus::Active,
            },
            program,
        }
    }

    #[tokio::test]
    async fn insert_get_and_list_in_order() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        let names = ["Zed", "Amy", "Mo"];
        let mut ids = Vec::new();
        for name in names {
            let r = record(name, "Teller");
            ids.push(r.employee.id);
            store.insert(r).await.unwrap();
        }

        assert_eq!(store.len().await, 3);
        let listed: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.employee.name)
            .collect();
        assert_eq!(listed, names);

        let fetched = store.get(ids[1]).await.unwrap();
        assert_eq!(fetched.employee.name, "Amy");
    }

    #[tokio::test]
    async fn rejects_mismatched_pair_and_duplicates() {
        let store = MemoryStore::new();
        let mut broken = record("Amy", "Teller");
        broken.employee.onboarding_program_id = Uuid::new_v4();
        assert_eq!(
            store.insert(broken).await.unwrap_err().kind(),
            "validation_error"
        );
        assert!(store.is_empty().await);

        let r = record("Amy", "Teller");
        store.insert(r.clone()).await.unwrap();
        assert!(store.insert(r).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_many_is_all_or_nothing() {
        let store = MemoryStore::new();
        let existing = record("Amy", "Teller");
        store.insert(existing.clone()).await.unwrap();

        let batch = vec![record("Bo", "Teller"), existing, record("Cy", "Loan Officer")];
        let err = store.insert_many(batch).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
        assert_eq!(store.len().await, 1);

        let repeated = record("Dee", "Teller");
        let err = store
            .insert_many(vec![repeated.clone(), repeated])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation_error");
        assert_eq!(store.len().await, 1);

        store
            .insert_many(vec![record("Bo", "Teller"), record("Cy", "Loan Officer")])
            .await
            .unwrap();
        let names: Vec<String> = store
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.employee.name)
            .collect();
        assert_eq!(names, ["Amy", "Bo", "Cy"]);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), "employee_not_found");

        let err = store
            .complete_task(Uuid::new_v4(), "teller-cash-handling", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "employee_not_found");
    }

    #[tokio::test]
    async fn complete_task_mutates_stored_record() {
        let store = MemoryStore::new();
        let r = record("Amy", "Teller");
        let id = r.employee.id;
        store.insert(r).await.unwrap();

        let outcome = store
            .complete_task(id, "teller-cash-handling", Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome.progress, 20.0);

        let listed = store.list().await.unwrap();
        let summary = &listed[0];
        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.total_tasks, 5);
        assert_eq!(summary.progress, 20.0);
    }

    #[tokio::test]
    async fn clear_all_empties_everything() {
        let store = MemoryStore::new();
        for name in ["A", "B"] {
            store.insert(record(name, "Personal Banker")).await.unwrap();
        }
        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.snapshot().await.unwrap().is_empty());
        assert_eq!(store.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_completions_stamp_once() {
        let store = Arc::new(MemoryStore::new());
        let r = record("Amy", "Teller");
        let id = r.employee.id;
        store.insert(r).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let now = Utc::now() + chrono::Duration::seconds(i);
                    store.complete_task(id, "teller-fraud-prevention", now).await
                })
            })
            .collect();

        let mut fresh = 0;
        let mut stamps = Vec::new();
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            if !outcome.already_completed {
                fresh += 1;
            }
            stamps.push(outcome.task.completed_date);
        }
        assert_eq!(fresh, 1);
        stamps.dedup();
        assert_eq!(stamps.len(), 1);

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.program.completed_count(), 1);
    }
}
