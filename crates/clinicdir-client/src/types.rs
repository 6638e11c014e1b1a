use clinicdir_core::{Draft, ExistingClinic};
use clinicdir_review::{PhotoSelection, RatingOptions, RatingSource};
use serde::Serialize;

/// A normalized `GET /drafts/{id}` response.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub draft: Draft,
    /// The clinic record embedded in the response, when the API sends one.
    pub existing_clinic: Option<ExistingClinic>,
}

/// Body of `POST /admin/drafts/{id}/approve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub photo_source: PhotoSelection,
    pub rating_source: RatingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_review_count: Option<u32>,
}

impl ApproveRequest {
    /// Manual rating values are only sent when the rating source is manual.
    #[must_use]
    pub fn new(photo_source: PhotoSelection, rating: &RatingOptions) -> Self {
        let manual = rating.rating_source == RatingSource::Manual;
        Self {
            photo_source,
            rating_source: rating.rating_source,
            manual_rating: rating.manual_rating.filter(|_| manual),
            manual_review_count: rating.manual_review_count.filter(|_| manual),
        }
    }
}

/// Body of `POST /admin/drafts/{id}/reject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RejectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RejectRequest {
    #[must_use]
    pub fn new(reason: Option<&str>) -> Self {
        Self {
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }
    }
}
