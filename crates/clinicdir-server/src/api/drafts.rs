use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use clinicdir_client::{load_draft_review, ApproveRequest, DraftReview, RejectRequest};
use clinicdir_review::{
    build_preview, PhotoSelection, Preview, RatingOptions, RatingSource, ReviewOutcome,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PreviewQuery {
    pub photo_source: Option<PhotoSelection>,
    pub rating_source: Option<RatingSource>,
    pub manual_rating: Option<f64>,
    pub manual_review_count: Option<u32>,
}

/// Moderator choices sent with an approval. Omitted fields fall back to
/// Google ratings and all photos.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ApproveBody {
    pub photo_source: PhotoSelection,
    pub rating_source: RatingSource,
    pub manual_rating: Option<f64>,
    pub manual_review_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RejectBody {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DecisionData {
    draft_id: i64,
    outcome: ReviewOutcome,
}

pub(super) async fn get_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(draft_id): Path<i64>,
) -> Result<Json<ApiResponse<DraftReview>>, ApiError> {
    let review = load_draft_review(&state.client, draft_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, review))
}

pub(super) async fn get_preview(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(draft_id): Path<i64>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<ApiResponse<Preview>>, ApiError> {
    let review = load_draft_review(&state.client, draft_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    let rating = RatingOptions {
        rating_source: query.rating_source.unwrap_or_default(),
        manual_rating: query.manual_rating,
        manual_review_count: query.manual_review_count,
    };
    let preview = build_preview(
        &review.merged,
        &rating,
        query.photo_source.unwrap_or_default(),
    );
    Ok(ApiResponse::new(req_id.0, preview))
}

pub(super) async fn approve(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(draft_id): Path<i64>,
    Json(body): Json<ApproveBody>,
) -> Result<Json<ApiResponse<DecisionData>>, ApiError> {
    let rating = RatingOptions {
        rating_source: body.rating_source,
        manual_rating: body.manual_rating,
        manual_review_count: body.manual_review_count,
    };
    state
        .client
        .approve_draft(draft_id, &ApproveRequest::new(body.photo_source, &rating))
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(decision(req_id, draft_id, ReviewOutcome::Approved))
}

pub(super) async fn reject(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(draft_id): Path<i64>,
    Json(body): Json<RejectBody>,
) -> Result<Json<ApiResponse<DecisionData>>, ApiError> {
    state
        .client
        .reject_draft(draft_id, &RejectRequest::new(body.reason.as_deref()))
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(decision(req_id, draft_id, ReviewOutcome::Rejected))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(draft_id): Path<i64>,
) -> Result<Json<ApiResponse<DecisionData>>, ApiError> {
    state
        .client
        .delete_draft(draft_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(decision(req_id, draft_id, ReviewOutcome::Deleted))
}

fn decision(
    req_id: RequestId,
    draft_id: i64,
    outcome: ReviewOutcome,
) -> Json<ApiResponse<DecisionData>> {
    ApiResponse::new(req_id.0, DecisionData { draft_id, outcome })
}
