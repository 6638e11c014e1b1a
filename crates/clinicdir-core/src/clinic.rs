use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, Photo, Procedure, Provider, SubmissionFlow, WorkingHours};

/// A published clinic record, flattened into the canonical field layout.
///
/// Procedures are always a flat list here; grouping by category is resolved
/// when the raw clinic payload is normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingClinic {
    pub id: i64,
    pub clinic_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub category: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub place_id: String,
    pub google_rating: f64,
    pub google_review_count: u32,
    #[serde(rename = "googleReviewsJSON")]
    pub google_reviews_json: Option<serde_json::Value>,
    pub working_hours: Option<WorkingHours>,
    pub icon_url: String,
    pub providers: Vec<Provider>,
    pub procedures: Vec<Procedure>,
    pub photos: Vec<Photo>,
}

impl ExistingClinic {
    /// Projects the clinic into an adjustment draft targeting itself.
    #[must_use]
    pub fn to_draft(&self) -> Draft {
        Draft {
            draft_id: None,
            existing_clinic_id: Some(self.id),
            clinic_name: self.clinic_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            category: self.category.clone(),
            website: self.website.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            description: self.description.clone(),
            place_id: self.place_id.clone(),
            google_rating: self.google_rating,
            google_review_count: self.google_review_count,
            google_reviews_json: self.google_reviews_json.clone(),
            working_hours: self.working_hours.clone(),
            icon_url: self.icon_url.clone(),
            submission_flow: SubmissionFlow::AddToExisting,
            providers: self.providers.clone(),
            procedures: self.procedures.clone(),
            photos: self.photos.clone(),
        }
    }
}

/// One row of the soft-deleted clinic listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedClinicSummary {
    pub clinic_id: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    /// The record reconstructed as an adjustment draft, ready for restore review.
    pub draft: Draft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_draft_targets_the_clinic() {
        let clinic = ExistingClinic {
            id: 42,
            clinic_name: "Acme Clinic".to_string(),
            google_review_count: 12,
            ..ExistingClinic::default()
        };
        let draft = clinic.to_draft();
        assert_eq!(draft.existing_clinic_id, Some(42));
        assert_eq!(draft.clinic_name, "Acme Clinic");
        assert_eq!(draft.google_review_count, 12);
        assert!(draft.is_adjustment());
        assert!(draft.draft_id.is_none());
    }
}
