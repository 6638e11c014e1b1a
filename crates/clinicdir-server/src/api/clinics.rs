use axum::{
    extract::{Path, State},
    Extension, Json,
};
use clinicdir_client::{load_clinic_for_edit, submit_clinic_edit};
use clinicdir_core::Draft;
use clinicdir_review::{normalize, SourceKind};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_client_error, map_review_error, ApiError, ApiResponse, AppState};

pub(super) async fn get_edit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(clinic_id): Path<i64>,
) -> Result<Json<ApiResponse<Draft>>, ApiError> {
    let draft = load_clinic_for_edit(&state.client, clinic_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, draft))
}

/// Accepts the edited clinic in any key casing the normalizer understands
/// and forwards it as an adjustment draft.
pub(super) async fn submit_edit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(clinic_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let edited = normalize(&body, SourceKind::SubmittedDraft)
        .map_err(|e| map_review_error(req_id.0.clone(), &e))?;

    let response = submit_clinic_edit(
        &state.client,
        clinic_id,
        &edited,
        state.config.submitter_key.as_deref(),
    )
    .await
    .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, response))
}
