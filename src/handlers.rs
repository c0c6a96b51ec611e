// HTTP handlers for the health check and student endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    MessageResponse, NewStudent, StudentChanges, StudentEnvelope, StudentListEnvelope,
};
use crate::AppState;

fn default_limit() -> i64 {
    10
}

/// Paging parameters for GET /students/list
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Rows to skip
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    #[param(default = 0, minimum = 0)]
    pub offset: i64,

    /// Maximum rows to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "limit must not be negative"))]
    #[param(default = 10, minimum = 0)]
    pub limit: i64,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse,
            example = json!({"message": "pong"}))
    ),
    tag = "health"
)]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "pong".to_string(),
    })
}

/// Handler for GET /students/:id
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student found", body = StudentEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse,
            example = json!({"error": "student not found", "error_code": "NOT_FOUND", "timestamp": "2024-01-01T00:00:00+00:00"})),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn find_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentEnvelope>, ApiError> {
    tracing::debug!("Fetching student with id: {}", id);

    let student = state.students.find(&id).await?;
    Ok(Json(StudentEnvelope { student }))
}

/// Handler for GET /students/list
/// Rows come back in identifier order
#[utoipa::path(
    get,
    path = "/students/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of students", body = StudentListEnvelope),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<StudentListEnvelope>, ApiError> {
    let Query(query) = query?;
    query.validate()?;
    tracing::debug!(
        "Listing students with offset {} and limit {}",
        query.offset,
        query.limit
    );

    let students = state.students.list(query.offset, query.limit).await?;
    Ok(Json(StudentListEnvelope { students }))
}

/// Handler for POST /students
#[utoipa::path(
    post,
    path = "/students",
    request_body = NewStudent,
    responses(
        (status = 200, description = "Student created", body = StudentEnvelope),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Json<StudentEnvelope>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let student = state.students.create(payload).await?;
    tracing::info!("Student {} created by {}", student.id, user.email);

    Ok(Json(StudentEnvelope { student }))
}

/// Handler for PATCH /students/:id
/// Only the supplied fields change; the identifier never does
#[utoipa::path(
    patch,
    path = "/students/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    request_body = StudentChanges,
    responses(
        (status = 200, description = "Student updated", body = StudentEnvelope),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthenticatedUser,
    payload: Result<Json<StudentChanges>, JsonRejection>,
) -> Result<Json<StudentEnvelope>, ApiError> {
    let Json(changes) = payload?;
    changes.validate()?;

    let student = state.students.update(&id, changes).await?;
    tracing::info!("Student {} updated by {}", student.id, user.email);

    Ok(Json(StudentEnvelope { student }))
}

/// Handler for DELETE /students/:id
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse,
            example = json!({"message": "student deleted"})),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.students.delete(&id).await?;
    tracing::info!("Student {} deleted by {}", id, user.email);

    Ok(Json(MessageResponse {
        message: "student deleted".to_string(),
    }))
}
