// Router tests for the Students API
// Requests go through the full middleware stack over an in-memory store

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use super::*;
use crate::auth::password::PasswordService;
use crate::auth::token::TokenService;
use crate::auth::{AuthService, Claims, JwtAuthService};
use crate::db::memory::MemoryDatabase;
use crate::models::Student;

const SECRET: &str = "test_secret_key_for_testing_purposes";

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    db: MemoryDatabase,
    auth: JwtAuthService,
}

fn create_test_app() -> TestApp {
    let db = MemoryDatabase::new();
    // Small hashing cost so the suite stays fast
    let auth = JwtAuthService::new(
        TokenService::new(SECRET, 3600),
        PasswordService::new(1024, 1, 1).unwrap(),
    );
    let state = AppState::new(Arc::new(db.clone()), Arc::new(auth.clone()));

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        db,
        auth,
    }
}

impl TestApp {
    fn bearer(&self) -> HeaderValue {
        let token = self
            .auth
            .generate_token("john.doe@gmail.com", "admin")
            .unwrap();
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn create_student(&self, payload: &Value) -> Student {
        let response = self
            .server
            .post("/students")
            .add_header(header::AUTHORIZATION, self.bearer())
            .json(payload)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        serde_json::from_value(body["student"].clone()).unwrap()
    }

    async fn register_john(&self) {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "name": "John Doe",
                "email": "john.doe@gmail.com",
                "password": "correct horse",
                "role": "admin"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

fn student_payload(first_name: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Doe",
        "age": 33,
        "email": format!("{}.doe@gmail.com", first_name.to_lowercase())
    })
}

// ============================================================================
// Health check
// ============================================================================

#[tokio::test]
async fn test_ping() {
    let app = create_test_app();

    let response = app.server.get("/ping").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"message": "pong"}));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_test_app();

    let response = app.server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/students/{id}"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

// ============================================================================
// Bearer token guard
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = create_test_app();

    let response = app.server.get("/students/1").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "token not found");
    assert_eq!(body["error_code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_header_is_rejected() {
    let app = create_test_app();

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "token"] {
        let response = app
            .server
            .get("/students/list")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static(value))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "malformed header");
    }
}

#[tokio::test]
async fn test_corrupted_token_is_rejected() {
    let app = create_test_app();

    let response = app
        .server
        .get("/students/list")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not.a.token"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "couldn't parse token");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = create_test_app();
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: "john.doe@gmail.com".to_string(),
        role: "admin".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .server
        .get("/students/list")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "token is not valid");
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let app = create_test_app();
    let token = TokenService::new("another_secret", 3600)
        .generate_token("john.doe@gmail.com", "admin")
        .unwrap();

    let response = app
        .server
        .get("/students/list")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Login / register
// ============================================================================

#[tokio::test]
async fn test_register_does_not_return_password() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@gmail.com",
            "password": "correct horse"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], "john.doe@gmail.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["id"].as_i64().unwrap() > 0);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = create_test_app();
    app.register_john().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Other John",
            "email": "john.doe@gmail.com",
            "password": "another"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "user already exists");
}

#[tokio::test]
async fn test_register_invalid_body() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({"name": "John", "email": "not-an-email", "password": "x"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "VALIDATION_ERROR");

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({"name": "John"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_returns_token() {
    let app = create_test_app();
    app.register_john().await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"email": "john.doe@gmail.com", "password": "correct horse"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let token = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!token.is_empty());

    let claims = app.auth.check_token(&token).unwrap();
    assert_eq!(claims.email, "john.doe@gmail.com");
    assert_eq!(claims.role, "admin");

    // The issued token opens the protected routes
    let response = app
        .server
        .get("/students/list")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();
    app.register_john().await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"email": "john.doe@gmail.com", "password": "wrong"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "invalid password");
}

#[tokio::test]
async fn test_login_unknown_email_looks_like_wrong_password() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"email": "nobody@gmail.com", "password": "whatever"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "invalid password");
}

#[tokio::test]
async fn test_login_malformed_json() {
    let app = create_test_app();

    let response = app
        .server
        .post("/auth/login")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_store_outage() {
    let app = create_test_app();
    app.db.set_unavailable(true);

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"email": "john.doe@gmail.com", "password": "correct horse"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Students
// ============================================================================

#[tokio::test]
async fn test_create_then_find_student() {
    let app = create_test_app();
    let created = app.create_student(&student_payload("John")).await;
    assert!(created.id > 0);

    let response = app
        .server
        .get(&format!("/students/{}", created.id))
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "student": {
                "id": created.id,
                "first_name": "John",
                "last_name": "Doe",
                "age": 33,
                "email": "john.doe@gmail.com"
            }
        })
    );
}

#[tokio::test]
async fn test_find_missing_student() {
    let app = create_test_app();

    for path in ["/students/1", "/students/abc"] {
        let response = app
            .server
            .get(path)
            .add_header(header::AUTHORIZATION, app.bearer())
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "student not found");
    }
}

#[tokio::test]
async fn test_create_student_invalid_body() {
    let app = create_test_app();

    let response = app
        .server
        .post("/students")
        .add_header(header::AUTHORIZATION, app.bearer())
        .json(&json!({"first_name": "", "last_name": "Doe", "age": -1, "email": "x"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["details"]["age"].is_array());

    let response = app
        .server
        .post("/students")
        .add_header(header::AUTHORIZATION, app.bearer())
        .json(&json!({"first_name": "John", "age": "old"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(app.db.student_count(), 0);
}

#[tokio::test]
async fn test_list_students_in_store_order() {
    let app = create_test_app();
    let john = app.create_student(&student_payload("John")).await;
    let jane = app.create_student(&student_payload("Jane")).await;

    let response = app
        .server
        .get("/students/list")
        .add_query_param("offset", 0)
        .add_query_param("limit", 10)
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let students: Vec<Student> =
        serde_json::from_value(response.json::<Value>()["students"].clone()).unwrap();
    assert_eq!(students, vec![john, jane.clone()]);

    let response = app
        .server
        .get("/students/list?offset=1&limit=1")
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;
    let students: Vec<Student> =
        serde_json::from_value(response.json::<Value>()["students"].clone()).unwrap();
    assert_eq!(students, vec![jane]);
}

#[tokio::test]
async fn test_list_students_defaults_and_empty() {
    let app = create_test_app();

    let response = app
        .server
        .get("/students/list")
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"students": []}));
}

#[tokio::test]
async fn test_list_students_bad_query() {
    let app = create_test_app();

    for query in ["offset=-1", "limit=-1", "offset=abc"] {
        let response = app
            .server
            .get(&format!("/students/list?{query}"))
            .add_header(header::AUTHORIZATION, app.bearer())
            .await;

        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "query {query} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_update_student_keeps_identifier() {
    let app = create_test_app();
    let created = app.create_student(&student_payload("John")).await;

    let response = app
        .server
        .patch(&format!("/students/{}", created.id))
        .add_header(header::AUTHORIZATION, app.bearer())
        .json(&json!({"id": 999, "first_name": "Johnny", "age": 34}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["student"]["id"], created.id);
    assert_eq!(body["student"]["first_name"], "Johnny");
    assert_eq!(body["student"]["last_name"], "Doe");
    assert_eq!(body["student"]["age"], 34);
}

#[tokio::test]
async fn test_update_missing_student() {
    let app = create_test_app();

    let response = app
        .server
        .patch("/students/42")
        .add_header(header::AUTHORIZATION, app.bearer())
        .json(&json!({"first_name": "Johnny"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_student_invalid_body() {
    let app = create_test_app();
    let created = app.create_student(&student_payload("John")).await;

    let response = app
        .server
        .patch(&format!("/students/{}", created.id))
        .add_header(header::AUTHORIZATION, app.bearer())
        .json(&json!({"email": "not-an-email"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_student_twice() {
    let app = create_test_app();
    let created = app.create_student(&student_payload("John")).await;
    let path = format!("/students/{}", created.id);

    let response = app
        .server
        .delete(&path)
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "student deleted"})
    );
    assert_eq!(app.db.student_count(), 0);

    let response = app
        .server
        .delete(&path)
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_is_internal_error() {
    let app = create_test_app();
    app.db.set_unavailable(true);

    let response = app
        .server
        .get("/students/list")
        .add_header(header::AUTHORIZATION, app.bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error_code"], "DATABASE_ERROR");
    assert_eq!(body["error"], "a database error occurred");
}
