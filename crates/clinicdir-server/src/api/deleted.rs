use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use clinicdir_client::find_deleted_clinic;
use clinicdir_core::{DeletedClinicSummary, Draft};
use clinicdir_review::ReviewOutcome;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_client_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct DeletedQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct RestoreData {
    clinic_id: i64,
    outcome: ReviewOutcome,
    /// The record as it was listed before the restore.
    clinic: Draft,
}

pub(super) async fn list_deleted(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DeletedQuery>,
) -> Result<Json<ApiResponse<Vec<DeletedClinicSummary>>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = normalize_limit(query.limit, state.config.deleted_page_size);
    let rows = state
        .client
        .list_deleted_clinics(page, limit)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, rows))
}

/// Restores a clinic only after confirming it is on the deleted listing.
pub(super) async fn restore(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(clinic_id): Path<i64>,
) -> Result<Json<ApiResponse<RestoreData>>, ApiError> {
    let summary = find_deleted_clinic(
        &state.client,
        clinic_id,
        state.config.deleted_page_size,
        state.config.deleted_max_pages,
    )
    .await
    .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    state
        .client
        .restore_clinic(clinic_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(
        req_id.0,
        RestoreData {
            clinic_id,
            outcome: ReviewOutcome::Restored,
            clinic: summary.draft,
        },
    ))
}
