//! Task completion tracker — the single mutation path for program state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{EmployeeDetail, EmployeeRecord, EmployeeStatus, TaskInstance};
use super::store::OnboardingStore;
use crate::error::OnboardingError;

/// What happened when a task was completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    /// True when the task was already done and nothing changed.
    pub already_completed: bool,
    pub task: TaskInstance,
    pub progress: f64,
    #[serde(flatten)]
    pub detail: EmployeeDetail,
}

/// Mark `task_id` completed on `record`, stamping `now` on first completion.
///
/// Re-completing a task leaves its original `completed_date` in place.
/// The employee status flips to `completed` when the last task is done.
pub fn apply_completion(
    record: &mut EmployeeRecord,
    task_id: &str,
    now: DateTime<Utc>,
) -> Result<TaskCompletion, OnboardingError> {
    let employee_id = record.employee.id;
    let task = record
        .program
        .task_mut(task_id)
        .ok_or_else(|| OnboardingError::TaskNotFound {
            employee_id,
            task_id: task_id.to_string(),
        })?;

    let already_completed = task.completed;
    if !already_completed {
        task.completed = true;
        task.completed_date = Some(now);
    }
    let task = task.clone();

    if !already_completed && record.program.is_complete() {
        record.employee.status = EmployeeStatus::Completed;
    }

    Ok(TaskCompletion {
        already_completed,
        task,
        progress: record.program.progress_percentage(),
        detail: record.detail(),
    })
}

/// Records task completions against the shared store.
pub struct TaskCompletionTracker {
    store: Arc<dyn OnboardingStore>,
}

impl TaskCompletionTracker {
    pub fn new(store: Arc<dyn OnboardingStore>) -> Self {
        Self { store }
    }

    pub async fn complete_task(
        &self,
        employee_id: Uuid,
        task_id: &str,
    ) -> Result<TaskCompletion, OnboardingError> {
        let outcome = self
            .store
            .complete_task(employee_id, task_id, Utc::now())
            .await?;

        if outcome.already_completed {
            debug!(employee_id = %employee_id, task_id, "Task already completed, nothing to do");
        } else {
            info!(
                employee_id = %employee_id,
                task_id,
                progress = outcome.progress,
                status = %outcome.detail.employee.status,
                "Task completed"
            );
        }
        Ok(outcome)
    }
}
