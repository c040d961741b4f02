/// Common test utilities for integration tests
///
/// Provides shared infrastructure: a test context holding the database
/// pool and an in-process router, request helpers that drive the app
/// through `tower::ServiceExt::oneshot`, and response helpers.
///
/// Tests require a running PostgreSQL database configured via
/// `DATABASE_URL`, plus a `JWT_SECRET` of at least 32 characters.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt as _;
use uuid::Uuid;

use taskdeck_api::{
    app::{build_router, AppState},
    config::Config,
};

/// Test context containing the database pool and the router under test
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context against the configured test database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        taskdeck_shared::db::migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router
    ///
    /// `token` is attached as the session cookie when present.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Registers a user and returns (user_id, session token)
    pub async fn register(&self, email: &str, password: &str) -> (Uuid, String) {
        let response = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let token = session_token_from(&response);
        let body = read_json(response).await;
        let user_id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

        (user_id, token)
    }

    /// Creates a project and returns its JSON representation
    pub async fn create_project(&self, token: &str, name: &str) -> Value {
        let response = self
            .send(
                "POST",
                "/api/projects",
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        read_json(response).await
    }

    /// Invites a user to a project by email
    pub async fn invite(&self, token: &str, project_id: &str, email: &str) -> Response {
        self.send(
            "POST",
            &format!("/api/projects/{}/members", project_id),
            Some(token),
            Some(json!({ "email": email })),
        )
        .await
    }

    /// Creates a task and returns its JSON representation
    pub async fn create_task(&self, token: &str, project_id: &str, body: Value) -> Value {
        let response = self
            .send(
                "POST",
                &format!("/api/projects/{}/tasks", project_id),
                Some(token),
                Some(body),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        read_json(response).await
    }
}

/// Generates a unique email so tests never collide on the shared database
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

/// Extracts the session token from a response's Set-Cookie header
pub fn session_token_from(response: &Response) -> String {
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header should be present")
        .to_str()
        .unwrap();

    cookie
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches("token=")
        .to_string()
}

/// Returns the raw Set-Cookie header value
pub fn set_cookie_header(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header should be present")
        .to_str()
        .unwrap()
        .to_string()
}

/// Reads a response body as JSON
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
