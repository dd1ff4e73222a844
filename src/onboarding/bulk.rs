//! Bulk lifecycle operations: demo-data population and full reset.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::directory::EmployeeDirectory;
use super::model::{EmployeeDetail, NewEmployee};
use super::tracker::apply_completion;
use crate::error::OnboardingError;

/// Demo roster: (name, email, role, department, manager).
pub const DEMO_ROSTER: &[(&str, &str, &str, &str, &str)] = &[
    ("Sarah Johnson", "sarah.johnson@bank.com", "Teller", "Branch Operations", "Mike Chen"),
    ("David Rodriguez", "david.rodriguez@bank.com", "Personal Banker", "Retail Banking", "Lisa Park"),
    ("Emily Chen", "emily.chen@bank.com", "Business Banking Specialist", "Commercial Banking", "Robert Smith"),
    ("Michael Thompson", "michael.thompson@bank.com", "Teller", "Branch Operations", "Mike Chen"),
    ("Jessica Liu", "jessica.liu@bank.com", "Personal Banker", "Retail Banking", "Lisa Park"),
];

pub struct BulkOperations {
    directory: Arc<EmployeeDirectory>,
}

impl BulkOperations {
    pub fn new(directory: Arc<EmployeeDirectory>) -> Self {
        Self { directory }
    }

    /// Append the demo roster, completing each new employee's first task.
    ///
    /// Records are built in full before they are stored, so the whole roster
    /// lands in one write. Existing employees are kept; calling twice yields
    /// two copies.
    pub async fn populate_demo_data(&self) -> Result<Vec<EmployeeDetail>, OnboardingError> {
        let now = Utc::now();
        let mut records = Vec::with_capacity(DEMO_ROSTER.len());

        for &(name, email, role, department, manager) in DEMO_ROSTER {
            let request =
                NewEmployee::new(name, email, role, manager).with_department(department);
            let mut record = self.directory.prepare_record(request)?;

            if let Some(first_id) = record.program.tasks.first().map(|t| t.id.clone()) {
                apply_completion(&mut record, &first_id, now)?;
            }
            records.push(record);
        }

        let created = self.directory.insert_records(records).await?;
        info!(count = created.len(), "Demo employees populated");
        Ok(created)
    }

    /// Clear every employee and program instance.
    pub async fn reset_all(&self) -> Result<usize, OnboardingError> {
        self.directory.clear_all().await
    }
}
