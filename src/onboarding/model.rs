//! Employee and program-instance data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{Priority, ProgramTemplate};
use crate::error::OnboardingError;

/// Onboarding status of an employee. Derived from program progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Completed,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// An employee going through onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Copied from the role's template, never from the request.
    pub department: String,
    pub start_date: NaiveDate,
    pub manager: String,
    /// The employee's own program instance.
    pub onboarding_program_id: Uuid,
    pub status: EmployeeStatus,
}

/// A task inside an employee's program, with completion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub estimated_time: u32,
    pub priority: Priority,
    pub resources: Vec<String>,
    pub completed: bool,
    /// Set iff `completed`.
    pub completed_date: Option<DateTime<Utc>>,
}

/// Per-employee copy of a program template.
///
/// The task list is fixed at instantiation; only completion flags change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInstance {
    pub id: Uuid,
    pub template_id: String,
    pub role: String,
    pub department: String,
    pub duration_days: u32,
    pub tasks: Vec<TaskInstance>,
}

impl ProgramInstance {
    /// Instantiate a template with every task uncompleted.
    pub fn from_template(template: &ProgramTemplate) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id: template.id.clone(),
            role: template.role.clone(),
            department: template.department.clone(),
            duration_days: template.duration_days,
            tasks: template
                .tasks
                .iter()
                .map(|t| TaskInstance {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    description: t.description.clone(),
                    category: t.category.clone(),
                    estimated_time: t.estimated_time,
                    priority: t.priority,
                    resources: t.resources.clone(),
                    completed: false,
                    completed_date: None,
                })
                .collect(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// 100 × completed / total, or 0.0 for an empty program.
    pub fn progress_percentage(&self) -> f64 {
        let total = self.total_tasks();
        if total == 0 {
            return 0.0;
        }
        (self.completed_count() as f64 * 100.0) / total as f64
    }

    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    pub fn task(&self, task_id: &str) -> Option<&TaskInstance> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &str) -> Option<&mut TaskInstance> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

/// An employee together with their program. The unit the store holds.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub employee: Employee,
    pub program: ProgramInstance,
}

impl EmployeeRecord {
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            employee: self.employee.clone(),
            progress: self.program.progress_percentage(),
            completed_tasks: self.program.completed_count(),
            total_tasks: self.program.total_tasks(),
        }
    }

    pub fn detail(&self) -> EmployeeDetail {
        EmployeeDetail {
            employee: self.employee.clone(),
            program: ProgramView::from(&self.program),
        }
    }
}

/// Program as returned to clients: the instance plus its derived progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramView {
    #[serde(flatten)]
    pub instance: ProgramInstance,
    pub progress_percentage: f64,
}

impl From<&ProgramInstance> for ProgramView {
    fn from(instance: &ProgramInstance) -> Self {
        Self {
            progress_percentage: instance.progress_percentage(),
            instance: instance.clone(),
        }
    }
}

/// Row in the employee list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub employee: Employee,
    pub progress: f64,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

/// Full employee view with every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub program: ProgramView,
}

/// Request to create an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    /// Optional; if given it must match the role's department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub manager: String,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        manager: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            department: None,
            manager: manager.into(),
        }
    }

    /// Builder: set the claimed department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Check field shapes. Role existence is the catalog's job.
    pub fn validate(&self) -> Result<(), OnboardingError> {
        if self.name.trim().is_empty() {
            return Err(OnboardingError::validation("name must not be empty"));
        }
        if self.role.trim().is_empty() {
            return Err(OnboardingError::validation("role must not be empty"));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(OnboardingError::validation(format!(
                "email {:?} is not a valid address",
                self.email
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
