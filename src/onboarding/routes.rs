//! REST endpoints for employees, task completion, analytics and programs.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use super::manager::OnboardingManager;
use super::model::NewEmployee;
use super::tracker::TaskCompletion;
use crate::error::OnboardingError;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

#[derive(Debug, Deserialize)]
struct CompleteTaskRequest {
    task_id: String,
}

#[derive(Debug, Serialize)]
struct CompleteTaskResponse {
    success: bool,
    #[serde(flatten)]
    outcome: TaskCompletion,
}

/// Unparseable ids cannot name an employee.
fn parse_employee_id(raw: &str) -> Result<Uuid, OnboardingError> {
    Uuid::parse_str(raw).map_err(|_| OnboardingError::EmployeeNotFound {
        id: raw.to_string(),
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, OnboardingError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed request body");
            Err(OnboardingError::validation(rejection.body_text()))
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "bank-onboard"
    }))
}

/// GET /onboarding/analytics
async fn get_analytics(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.manager.analytics().await?))
}

/// POST /onboarding/clear and DELETE /onboarding/demo-data
async fn clear_all(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    let removed = state.manager.reset_all().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All onboarding data cleared successfully",
        "removed": removed,
    })))
}

/// POST /onboarding/demo-data
async fn populate_demo_data(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    let created = state.manager.populate_demo_data().await?;
    let analytics = state.manager.analytics().await?;
    let employees: Vec<_> = created.into_iter().map(|d| d.employee).collect();
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Created {} demo employees", employees.len()),
        "employees": employees,
        "analytics": analytics,
    })))
}

/// GET /onboarding/employees
async fn list_employees(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    let employees = state.manager.list_employees().await?;
    Ok(Json(serde_json::json!({
        "count": employees.len(),
        "employees": employees,
    })))
}

/// POST /onboarding/employees
async fn create_employee(
    State(state): State<OnboardingRouteState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<impl IntoResponse, OnboardingError> {
    let request = json_body(payload)?;
    let detail = state.manager.create_employee(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "employee": detail.employee,
            "program": detail.program,
        })),
    ))
}

/// GET /onboarding/employees/{id}
async fn get_employee(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, OnboardingError> {
    let id = parse_employee_id(&id)?;
    Ok(Json(state.manager.employee_detail(id).await?))
}

/// POST /onboarding/employees/{id}/complete-task
async fn complete_task(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
    payload: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, OnboardingError> {
    let id = parse_employee_id(&id)?;
    let body = json_body(payload)?;
    let outcome = state.manager.complete_task(id, &body.task_id).await?;
    Ok(Json(CompleteTaskResponse {
        success: true,
        outcome,
    }))
}

/// GET /onboarding/programs
async fn list_programs(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let programs = state.manager.programs();
    Json(serde_json::json!({
        "total_programs": programs.len(),
        "programs": programs,
    }))
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/onboarding/analytics", get(get_analytics))
        .route("/onboarding/clear", post(clear_all))
        .route(
            "/onboarding/demo-data",
            post(populate_demo_data).delete(clear_all),
        )
        .route(
            "/onboarding/employees",
            get(list_employees).post(create_employee),
        )
        .route("/onboarding/employees/{id}", get(get_employee))
        .route("/onboarding/employees/{id}/complete-task", post(complete_task))
        .route("/onboarding/programs", get(list_programs))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(allow_origin)
}

/// Full application router: onboarding routes plus tracing and CORS layers.
pub fn app(manager: Arc<OnboardingManager>, cors_origins: &[String]) -> Router {
    onboarding_routes(OnboardingRouteState { manager }).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::catalog::ProgramCatalog;

    #[test]
    fn bad_ids_are_not_found() {
        let err = parse_employee_id("not-a-uuid").unwrap_err();
        assert_eq!(err, OnboardingError::EmployeeNotFound { id: "not-a-uuid".into() });

        let id = Uuid::new_v4();
        assert_eq!(parse_employee_id(&id.to_string()).unwrap(), id);
    }

    #[tokio::test]
    async fn completion_response_is_flat() {
        let manager = OnboardingManager::in_memory(ProgramCatalog::builtin());
        let created = manager
            .create_employee(NewEmployee::new("A", "a@bank.com", "Teller", "M"))
            .await
            .unwrap();
        let outcome = manager
            .complete_task(created.employee.id, "teller-cash-handling")
            .await
            .unwrap();

        let json = serde_json::to_value(CompleteTaskResponse {
            success: true,
            outcome,
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["already_completed"], false);
        assert_eq!(json["progress"], 20.0);
        assert_eq!(json["task"]["id"], "teller-cash-handling");
        assert_eq!(json["employee"]["name"], "A");
        assert_eq!(json["program"]["progress_percentage"], 20.0);
    }
}
