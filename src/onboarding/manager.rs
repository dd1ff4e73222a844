//! OnboardingManager — wires the catalog, directory, tracker, analytics and
//! bulk operations around one shared store.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use super::analytics::{Analytics, AnalyticsAggregator};
use super::bulk::BulkOperations;
use super::catalog::{ProgramCatalog, ProgramSummary};
use super::directory::EmployeeDirectory;
use super::model::{EmployeeDetail, EmployeeSummary, NewEmployee};
use super::store::{MemoryStore, OnboardingStore};
use super::tracker::{TaskCompletion, TaskCompletionTracker};
use crate::config::ServerConfig;
use crate::error::{self, OnboardingError};

/// Entry point for every onboarding operation.
pub struct OnboardingManager {
    catalog: Arc<ProgramCatalog>,
    directory: Arc<EmployeeDirectory>,
    tracker: Arc<TaskCompletionTracker>,
    analytics: AnalyticsAggregator,
    bulk: BulkOperations,
}

impl OnboardingManager {
    /// Build a manager over the given catalog and store.
    pub fn new(catalog: Arc<ProgramCatalog>, store: Arc<dyn OnboardingStore>) -> Self {
        let directory = Arc::new(EmployeeDirectory::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
        ));
        let tracker = Arc::new(TaskCompletionTracker::new(Arc::clone(&store)));
        Self {
            catalog,
            analytics: AnalyticsAggregator::new(store),
            bulk: BulkOperations::new(Arc::clone(&directory)),
            directory,
            tracker,
        }
    }

    /// Manager backed by a fresh in-memory store.
    pub fn in_memory(catalog: ProgramCatalog) -> Self {
        Self::new(Arc::new(catalog), Arc::new(MemoryStore::new()))
    }

    /// Build the service manager from startup config: load the catalog and
    /// seed demo employees when asked to.
    pub async fn from_config(config: &ServerConfig) -> error::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => ProgramCatalog::from_file(path)?,
            None => ProgramCatalog::builtin(),
        };
        let manager = Self::in_memory(catalog);

        if config.seed_demo {
            manager.populate_demo_data().await?;
        }
        Ok(manager)
    }

    pub async fn create_employee(
        &self,
        request: NewEmployee,
    ) -> Result<EmployeeDetail, OnboardingError> {
        self.directory.create_employee(request).await
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummary>, OnboardingError> {
        self.directory.list_employees().await
    }

    pub async fn employee_detail(&self, id: Uuid) -> Result<EmployeeDetail, OnboardingError> {
        self.directory.get_employee_detail(id).await
    }

    pub async fn complete_task(
        &self,
        employee_id: Uuid,
        task_id: &str,
    ) -> Result<TaskCompletion, OnboardingError> {
        self.tracker.complete_task(employee_id, task_id).await
    }

    pub async fn analytics(&self) -> Result<Analytics, OnboardingError> {
        self.analytics.compute().await
    }

    pub async fn populate_demo_data(&self) -> Result<Vec<EmployeeDetail>, OnboardingError> {
        self.bulk.populate_demo_data().await
    }

    pub async fn reset_all(&self) -> Result<usize, OnboardingError> {
        self.bulk.reset_all().await
    }

    /// Program summaries keyed by catalog key.
    pub fn programs(&self) -> BTreeMap<String, ProgramSummary> {
        self.catalog
            .programs()
            .iter()
            .map(|p| (p.key.clone(), p.summary()))
            .collect()
    }
}
