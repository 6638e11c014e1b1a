//! Multi-request review workflows built on [`ClinicApiClient`].

use clinicdir_core::{DeletedClinicSummary, Draft, ExistingClinic, SubmissionFlow};
use clinicdir_review::{
    build_submission, compute_diff, merge_with_existing, DiffResult, ReviewSession,
};
use serde::Serialize;
use serde_json::Value;

use crate::client::ClinicApiClient;
use crate::error::ClientError;

/// Everything the review page shows for one draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReview {
    pub draft: Draft,
    pub existing: Option<ExistingClinic>,
    /// `draft` merged with `existing`, or `draft` itself for a new listing.
    pub merged: Draft,
    /// Changes `merged` makes to `existing`.
    pub diff: Option<DiffResult>,
}

impl DraftReview {
    #[must_use]
    pub fn new(draft: Draft, existing: Option<ExistingClinic>) -> Self {
        let (merged, diff) = match &existing {
            Some(clinic) => {
                let merged = merge_with_existing(&draft, clinic);
                let diff = compute_diff(&merged, clinic);
                (merged, Some(diff))
            }
            None => (draft.clone(), None),
        };
        Self {
            draft,
            existing,
            merged,
            diff,
        }
    }
}

/// Loads a draft and, for an adjustment draft, the clinic it targets.
///
/// The clinic and its photos are fetched concurrently. A clinic embedded in
/// the draft response is used only when the draft names no clinic id.
///
/// # Errors
///
/// Propagates any [`ClientError`] from the underlying requests.
pub async fn load_draft_review(
    client: &ClinicApiClient,
    draft_id: i64,
) -> Result<DraftReview, ClientError> {
    let record = client.get_draft(draft_id).await?;
    let draft = record.draft;

    let existing = match (draft.is_adjustment(), draft.existing_clinic_id) {
        (true, Some(clinic_id)) => Some(fetch_clinic(client, clinic_id).await?),
        _ => record.existing_clinic,
    };

    tracing::debug!(
        draft_id,
        adjustment = draft.is_adjustment(),
        has_existing = existing.is_some(),
        "loaded draft for review"
    );
    Ok(DraftReview::new(draft, existing))
}

/// Runs one review load through a fresh [`ReviewSession`], mapping a
/// not-found response and other failures to the matching session states.
pub async fn load_review_session(client: &ClinicApiClient, draft_id: i64) -> ReviewSession {
    let session = ReviewSession::new();
    let generation = session.generation();
    match load_draft_review(client, draft_id).await {
        Ok(review) => session.loaded(generation, review.draft, review.existing),
        Err(e) if e.is_not_found() => session.not_found(generation),
        Err(e) => {
            tracing::warn!(draft_id, error = %e, "failed to load draft for review");
            session.failed(generation, e.to_string())
        }
    }
}

/// Loads a published clinic, with its photo gallery, as an editable draft.
///
/// # Errors
///
/// Propagates any [`ClientError`] from the underlying requests.
pub async fn load_clinic_for_edit(
    client: &ClinicApiClient,
    clinic_id: i64,
) -> Result<Draft, ClientError> {
    Ok(fetch_clinic(client, clinic_id).await?.to_draft())
}

/// Submits an edited clinic as an adjustment draft targeting `clinic_id`.
///
/// When `submitter_key` is `None` a fresh v4 UUID is used.
///
/// # Errors
///
/// Propagates any [`ClientError`] from the submission request.
pub async fn submit_clinic_edit(
    client: &ClinicApiClient,
    clinic_id: i64,
    edited: &Draft,
    submitter_key: Option<&str>,
) -> Result<Value, ClientError> {
    let draft = Draft {
        existing_clinic_id: Some(clinic_id),
        submission_flow: SubmissionFlow::AddToExisting,
        ..edited.clone()
    };
    let key = submitter_key.map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);
    let payload = build_submission(&draft, &key);
    tracing::info!(clinic_id, "submitting clinic edit");
    client.submit_edit(&payload).await
}

/// Scans the deleted-clinic listing for `clinic_id`, page by page.
///
/// Stops at the first short page or after `max_pages` pages.
///
/// # Errors
///
/// Returns [`ClientError::NotFound`] when the clinic is not listed, or any
/// error from the listing requests.
pub async fn find_deleted_clinic(
    client: &ClinicApiClient,
    clinic_id: i64,
    page_size: u32,
    max_pages: u32,
) -> Result<DeletedClinicSummary, ClientError> {
    let page_size = page_size.max(1);
    for page in 1..=max_pages {
        let rows = client.list_deleted_clinics(page, page_size).await?;
        let row_count = rows.len();
        if let Some(found) = rows.into_iter().find(|row| row.clinic_id == clinic_id) {
            return Ok(found);
        }
        if row_count < page_size as usize {
            break;
        }
    }
    Err(ClientError::NotFound {
        resource: format!("deleted clinic {clinic_id}"),
    })
}

async fn fetch_clinic(
    client: &ClinicApiClient,
    clinic_id: i64,
) -> Result<ExistingClinic, ClientError> {
    let (mut clinic, photos) = tokio::try_join!(
        client.get_clinic(clinic_id),
        client.get_clinic_photos(clinic_id)
    )?;
    if !photos.is_empty() {
        clinic.photos = photos;
    }
    Ok(clinic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_review_without_existing_has_no_diff() {
        let draft = Draft {
            clinic_name: "Glow Aesthetics".to_string(),
            ..Draft::default()
        };
        let review = DraftReview::new(draft.clone(), None);
        assert_eq!(review.merged, draft);
        assert!(review.diff.is_none());
    }

    #[test]
    fn draft_review_merges_with_existing() {
        let draft = Draft {
            clinic_name: "test".to_string(),
            submission_flow: SubmissionFlow::AddToExisting,
            ..Draft::default()
        };
        let existing = ExistingClinic {
            id: 9,
            clinic_name: "Acme Clinic".to_string(),
            ..ExistingClinic::default()
        };
        let review = DraftReview::new(draft, Some(existing));
        assert_eq!(review.merged.clinic_name, "Acme Clinic");
        assert_eq!(review.diff.map(|d| d.has_changes), Some(false));
    }

    #[test]
    fn unset_rating_on_adjustment_is_not_a_change() {
        let draft = Draft {
            address: "2 Elm St".to_string(),
            submission_flow: SubmissionFlow::AddToExisting,
            ..Draft::default()
        };
        let existing = ExistingClinic {
            id: 9,
            address: "1 Acme Way".to_string(),
            google_rating: 4.2,
            google_review_count: 40,
            ..ExistingClinic::default()
        };
        let diff = DraftReview::new(draft, Some(existing))
            .diff
            .expect("adjustment drafts are diffed");
        let labels: Vec<&str> = diff.field_changes.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Address"]);
    }
}
