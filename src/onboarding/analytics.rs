//! Analytics aggregator — organization-wide and per-role rollups computed on
//! demand from a store snapshot. Holds no state of its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{EmployeeRecord, EmployeeStatus};
use super::store::OnboardingStore;
use crate::error::OnboardingError;

/// Rollup for every employee sharing a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStats {
    pub count: usize,
    pub completed: usize,
    pub average_progress: f64,
    /// Fraction in `[0, 1]`.
    pub completion_rate: f64,
}

/// Organization-wide onboarding rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_employees: usize,
    pub average_progress: f64,
    /// Fraction in `[0, 1]`.
    pub completion_rate: f64,
    pub by_role: BTreeMap<String, RoleStats>,
}

impl Analytics {
    /// The zero-employee baseline.
    pub fn empty() -> Self {
        Self {
            total_employees: 0,
            average_progress: 0.0,
            completion_rate: 0.0,
            by_role: BTreeMap::new(),
        }
    }
}

#[derive(Default)]
struct Tally {
    count: usize,
    completed: usize,
    progress_sum: f64,
}

impl Tally {
    fn add(&mut self, record: &EmployeeRecord) {
        self.count += 1;
        self.progress_sum += record.program.progress_percentage();
        if record.employee.status == EmployeeStatus::Completed {
            self.completed += 1;
        }
    }

    fn average_progress(&self) -> f64 {
        ratio(self.progress_sum, self.count)
    }

    fn completion_rate(&self) -> f64 {
        ratio(self.completed as f64, self.count)
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { numerator / count as f64 }
}

/// Pure rollup over a set of records.
pub fn compute_analytics(records: &[EmployeeRecord]) -> Analytics {
    let mut overall = Tally::default();
    let mut roles: BTreeMap<&str, Tally> = BTreeMap::new();

    for record in records {
        overall.add(record);
        roles
            .entry(record.employee.role.as_str())
            .or_default()
            .add(record);
    }

    Analytics {
        total_employees: overall.count,
        average_progress: overall.average_progress(),
        completion_rate: overall.completion_rate(),
        by_role: roles
            .into_iter()
            .map(|(role, tally)| {
                (
                    role.to_string(),
                    RoleStats {
                        count: tally.count,
                        completed: tally.completed,
                        average_progress: tally.average_progress(),
                        completion_rate: tally.completion_rate(),
                    },
                )
            })
            .collect(),
    }
}

/// Computes analytics from the live store.
pub struct AnalyticsAggregator {
    store: Arc<dyn OnboardingStore>,
}

impl AnalyticsAggregator {
    pub fn new(store: Arc<dyn OnboardingStore>) -> Self {
        Self { store }
    }

    pub async fn compute(&self) -> Result<Analytics, OnboardingError> {
        let snapshot = self.store.snapshot().await?;
        let analytics = compute_analytics(&snapshot);
        debug!(
            total = analytics.total_employees,
            average_progress = analytics.average_progress,
            "Computed onboarding analytics"
        );
        Ok(analytics)
    }
}
