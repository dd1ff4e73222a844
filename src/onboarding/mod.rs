//! Onboarding engine — role-based programs, task completion and analytics.
//!
//! Every employee is bound to one program instance copied from the catalog
//! at creation time. Task completion is the only mutation; progress, status
//! and analytics are derived from the stored task lists.

pub mod analytics;
pub mod bulk;
pub mod catalog;
pub mod directory;
pub mod manager;
pub mod model;
pub mod routes;
pub mod store;
pub mod tracker;

pub use analytics::{Analytics, AnalyticsAggregator, RoleStats, compute_analytics};
pub use bulk::{BulkOperations, DEMO_ROSTER};
pub use catalog::{Priority, ProgramCatalog, ProgramSummary, ProgramTemplate, TaskTemplate};
pub use directory::EmployeeDirectory;
pub use manager::OnboardingManager;
pub use model::{
    Employee, EmployeeDetail, EmployeeRecord, EmployeeStatus, EmployeeSummary, NewEmployee,
    ProgramInstance, ProgramView, TaskInstance,
};
pub use routes::{OnboardingRouteState, app, onboarding_routes};
pub use store::{MemoryStore, OnboardingStore};
pub use tracker::{TaskCompletion, TaskCompletionTracker, apply_completion};
