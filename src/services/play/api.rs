//! Play Service API
//!
//! REST endpoints for registering plays and listing a user's latest plays.
//! Rejections are answered with `400 Bad Request` and a message in the
//! caller's `Accept-Language`.

use super::service::PlayService;
use super::types::*;
use crate::error::{Error, ErrorCategory};
use crate::messages::MessageService;
use crate::models::{Play, UserId};
use axum::{
    extract::{Path, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

#[derive(Clone)]
struct ApiState {
    service: Arc<PlayService>,
    messages: Arc<MessageService>,
    started: Instant,
}

/// REST API implementation
pub struct PlayApi {
    state: ApiState,
    request_timeout: Duration,
}

impl PlayApi {
    pub fn new(
        service: Arc<PlayService>,
        messages: Arc<MessageService>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            state: ApiState {
                service,
                messages,
                started: Instant::now(),
            },
            request_timeout,
        }
    }

    /// Create REST API router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/users/:user_id/plays", post(create_play_handler))
            .route("/users/:user_id/plays/latest", get(latest_plays_handler))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        self.request_timeout,
                    ))
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }
}

/// An error ready to be rendered for a particular caller
struct ApiError {
    error: Error,
    locale: Option<String>,
    messages: Arc<MessageService>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.error.rejection() {
            Some(kind) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: kind.key().to_string(),
                    message: self.messages.message(kind, self.locale.as_deref()),
                },
            ),
            None => {
                tracing::error!(code = self.error.code(), "request failed: {}", self.error);
                let status = match self.error.category() {
                    ErrorCategory::Network => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    ErrorResponse {
                        error: self.error.code().to_string(),
                        message: self.error.to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl ApiState {
    fn fail(&self, headers: &HeaderMap, error: Error) -> ApiError {
        let locale = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| self.messages.negotiate(value));

        ApiError {
            error,
            locale,
            messages: self.messages.clone(),
        }
    }
}

/// Health check endpoint
async fn health_handler(State(state): State<ApiState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started.elapsed().as_secs(),
    })
}

/// Create play endpoint
async fn create_play_handler(
    State(state): State<ApiState>,
    Path(user_id): Path<UserId>,
    headers: HeaderMap,
    Json(body): Json<CreatePlayBody>,
) -> Result<(StatusCode, Json<Play>), ApiError> {
    match state.service.create_play(body.into_request(user_id)).await {
        Ok(play) => Ok((StatusCode::CREATED, Json(play))),
        Err(e) => Err(state.fail(&headers, e)),
    }
}

/// Latest plays endpoint
async fn latest_plays_handler(
    State(state): State<ApiState>,
    Path(user_id): Path<UserId>,
    headers: HeaderMap,
) -> Result<Json<Vec<PlaySummary>>, ApiError> {
    state
        .service
        .find_latest_plays(user_id)
        .await
        .map(Json)
        .map_err(|e| state.fail(&headers, e))
}
