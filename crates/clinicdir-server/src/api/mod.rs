mod clinics;
mod deleted;
mod drafts;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use clinicdir_client::{ClientError, ClinicApiClient};
use clinicdir_core::AppConfig;
use clinicdir_review::ReviewError;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ClinicApiClient>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a clinic API failure onto the response envelope. A missing record
/// is a 404; anything else the upstream did wrong is a 502.
pub(super) fn map_client_error(request_id: String, error: &ClientError) -> ApiError {
    match error {
        ClientError::NotFound { resource } => {
            tracing::debug!(%resource, "upstream record not found");
            ApiError::new(request_id, "not_found", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "clinic API request failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}

pub(super) fn map_review_error(request_id: String, error: &ReviewError) -> ApiError {
    tracing::warn!(error = %error, "rejected review input");
    ApiError::new(request_id, "validation_error", error.to_string())
}

pub(super) fn normalize_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, 200)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/drafts/{draft_id}/review", get(drafts::get_review))
        .route("/api/v1/drafts/{draft_id}/preview", get(drafts::get_preview))
        .route("/api/v1/drafts/{draft_id}/approve", post(drafts::approve))
        .route("/api/v1/drafts/{draft_id}/reject", post(drafts::reject))
        .route(
            "/api/v1/drafts/{draft_id}",
            axum::routing::delete(drafts::delete),
        )
        .route("/api/v1/clinics/{clinic_id}/edit", get(clinics::get_edit))
        .route(
            "/api/v1/clinics/{clinic_id}/submissions",
            post(clinics::submit_edit),
        )
        .route("/api/v1/deleted-clinics", get(deleted::list_deleted))
        .route(
            "/api/v1/deleted-clinics/{clinic_id}/restore",
            post(deleted::restore),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}
