//! Employee directory — creates employees against the program catalog and
//! serves list/detail reads.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::catalog::ProgramCatalog;
use super::model::{
    Employee, EmployeeDetail, EmployeeRecord, EmployeeStatus, EmployeeSummary, NewEmployee,
    ProgramInstance,
};
use super::store::OnboardingStore;
use crate::error::OnboardingError;

pub struct EmployeeDirectory {
    catalog: Arc<ProgramCatalog>,
    store: Arc<dyn OnboardingStore>,
}

impl EmployeeDirectory {
    pub fn new(catalog: Arc<ProgramCatalog>, store: Arc<dyn OnboardingStore>) -> Self {
        Self { catalog, store }
    }

    /// Create an employee bound to a fresh instance of their role's program.
    ///
    /// The department always comes from the template. A request that names a
    /// different department is rejected.
    pub async fn create_employee(
        &self,
        request: NewEmployee,
    ) -> Result<EmployeeDetail, OnboardingError> {
        let record = self.prepare_record(request)?;
        let detail = record.detail();

        self.store.insert(record).await?;
        info!(
            employee_id = %detail.employee.id,
            role = %detail.employee.role,
            tasks = detail.program.instance.tasks.len(),
            "Employee created"
        );
        Ok(detail)
    }

    /// Validate a request and build its employee record without storing it.
    pub fn prepare_record(&self, request: NewEmployee) -> Result<EmployeeRecord, OnboardingError> {
        request.validate()?;

        let template = self.catalog.get_template(&request.role).inspect_err(|_| {
            warn!(role = %request.role, "Rejected employee with unknown role");
        })?;

        if let Some(claimed) = request.department.as_deref().map(str::trim) {
            if !claimed.is_empty() && !claimed.eq_ignore_ascii_case(&template.department) {
                return Err(OnboardingError::validation(format!(
                    "department {claimed:?} does not match {:?} for role {}",
                    template.department, template.role
                )));
            }
        }

        let program = ProgramInstance::from_template(template);
        let employee = Employee {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            role: template.role.clone(),
            department: template.department.clone(),
            start_date: Utc::now().date_naive(),
            manager: request.manager.trim().to_string(),
            onboarding_program_id: program.id,
            status: EmployeeStatus::Active,
        };
        Ok(EmployeeRecord { employee, program })
    }

    /// Store prepared records in one step.
    pub async fn insert_records(
        &self,
        records: Vec<EmployeeRecord>,
    ) -> Result<Vec<EmployeeDetail>, OnboardingError> {
        let details: Vec<EmployeeDetail> = records.iter().map(EmployeeRecord::detail).collect();
        self.store.insert_many(records).await?;
        info!(count = details.len(), "Employees created");
        Ok(details)
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummary>, OnboardingError> {
        let employees = self.store.list().await?;
        debug!(count = employees.len(), "Listed employees");
        Ok(employees)
    }

    pub async fn get_employee_detail(&self, id: Uuid) -> Result<EmployeeDetail, OnboardingError> {
        Ok(self.store.get(id).await?.detail())
    }

    /// Remove every employee and program instance.
    pub async fn clear_all(&self) -> Result<usize, OnboardingError> {
        let removed = self.store.clear_all().await?;
        info!(removed, "Onboarding store cleared");
        Ok(removed)
    }

    pub fn catalog(&self) -> &ProgramCatalog {
        &self.catalog
    }
}
