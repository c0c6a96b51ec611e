//! Students API: CRUD over student records behind JWT authentication.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, Credentials, RegisterRequest, TokenResponse, User, UserEnvelope};
use db::DatabaseService;
use error::ErrorResponse;
use models::{
    MessageResponse, NewStudent, Student, StudentChanges, StudentEnvelope, StudentListEnvelope,
};
use repository::{StudentsRepo, StudentsRepository, UsersRepo, UsersRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::ping,
        handlers::find_student,
        handlers::list_students,
        handlers::create_student,
        handlers::update_student,
        handlers::delete_student,
        auth::handlers::login,
        auth::handlers::register,
    ),
    components(schemas(
        Student,
        NewStudent,
        StudentChanges,
        StudentEnvelope,
        StudentListEnvelope,
        MessageResponse,
        User,
        UserEnvelope,
        Credentials,
        RegisterRequest,
        TokenResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "students", description = "Student record management"),
        (name = "auth", description = "Login and registration")
    ),
    info(
        title = "Students API",
        version = "1.0.0",
        description = "CRUD service for student records with JWT authentication"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentsRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    /// Wire both repositories over one store
    pub fn new(db: Arc<dyn DatabaseService>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            students: Arc::new(StudentsRepo::new(db.clone())),
            users: Arc::new(UsersRepo::new(db)),
            auth,
        }
    }
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Every student route needs a bearer token
    let students = Router::new()
        .route("/students", post(handlers::create_student))
        .route("/students/list", get(handlers::list_students))
        .route(
            "/students/:id",
            get(handlers::find_student)
                .patch(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/register", post(auth::handlers::register));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            request_id = %uuid::Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/ping", get(handlers::ping))
        .merge(students)
        .merge(auth_routes)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}
