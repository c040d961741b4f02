/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::get,
    routing::post,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use taskdeck_shared::auth::middleware::cookie_auth_middleware;

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned into each handler via Axum's `State` extractor; the config sits
/// behind an Arc so clones stay cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether the server runs in production mode
    pub fn production(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # public
/// └── /api
///     ├── /auth
///     │   ├── POST /register                   # public, sets cookie
///     │   └── POST /login                      # public, sets cookie
///     ├── /users
///     │   └── GET /search                      # authenticated
///     └── /projects                            # gatekeeping middleware
///         ├── POST   /                         # create (token)
///         ├── GET    /                         # list (token)
///         ├── GET    /:project_id              # membership
///         ├── DELETE /:project_id              # ownership
///         ├── GET    /:project_id/members      # membership
///         ├── POST   /:project_id/members      # ownership
///         ├── GET    /:project_id/tasks        # membership
///         ├── POST   /:project_id/tasks        # membership
///         ├── PATCH  /:project_id/tasks/:task_id   # membership via parent
///         ├── DELETE /:project_id/tasks/:task_id   # membership
///         └── GET    /:project_id/export       # membership
/// ```
///
/// The `/api/projects` subtree carries the cookie-validating gate in
/// addition to each handler's own `Identity` check.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new().route("/search", get(routes::users::search_users));

    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/:project_id",
            get(routes::projects::get_project).delete(routes::projects::delete_project),
        )
        .route(
            "/:project_id/members",
            get(routes::members::list_members).post(routes::members::invite_member),
        )
        .route(
            "/:project_id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:project_id/tasks/:task_id",
            axum::routing::patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/:project_id/export", get(routes::export::export_project))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            project_gate,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/projects", project_routes);

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.production()))
        .with_state(state)
}

/// Gatekeeping layer for the project API prefix
///
/// Independently re-validates the session cookie for every request under
/// `/api/projects`, regardless of the target endpoint, and rejects with
/// 401 before the handler's own check runs.
async fn project_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let secret = state.jwt_secret().to_string();

    cookie_auth_middleware(secret, req, next)
        .await
        .map_err(ApiError::from)
}
