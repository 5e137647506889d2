//! Authentication service routes
//!
//! A thin adapter: request bodies are handed to [`CredentialService`] and its
//! results are mapped to status codes by [`CredentialError`].
//!
//! [`CredentialService`]: crate::service::CredentialService

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

use crate::{AppState, error::CredentialError, models::Credentials};

/// Body of every successful response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = state.db_pool.health_check().await.unwrap_or(false);

    let (status, label) = if database_up {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(serde_json::json!({
            "status": label,
            "service": "auth-service",
            "database": if database_up { "up" } else { "down" },
        })),
    )
}

/// User registration endpoint
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, CredentialError> {
    let Json(credentials) = payload.map_err(reject_body)?;

    let registered = state
        .credentials
        .register(&credentials.username, &credentials.password)
        .await?;
    debug!("Signup completed for {}", registered.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, CredentialError> {
    let Json(credentials) = payload.map_err(reject_body)?;

    let authenticated = state
        .credentials
        .authenticate(&credentials.username, &credentials.password)
        .await?;
    debug!("Login completed for {}", authenticated.username);

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Login successful",
        }),
    ))
}

/// Body rejections carry serde's description of the offending value, so only
/// the status is logged.
fn reject_body(rejection: JsonRejection) -> CredentialError {
    warn!(status = %rejection.status(), "Rejected request body");
    CredentialError::InvalidInput("Malformed request body".into())
}
