//! Shapes an edited draft into the clinic-management submission payload.

use clinicdir_core::{Draft, Photo, PhotoSource, Procedure, Provider, SubmissionFlow, WorkingHours};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub submitter_key: String,
    pub flow: SubmissionFlow,
    pub existing_clinic_id: Option<i64>,
    pub clinic: ClinicSection,
    pub advanced: AdvancedSection,
    pub providers: Vec<Provider>,
    pub procedures: Vec<Procedure>,
    /// User-sourced photos only; Google photos are managed upstream.
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSection {
    pub clinic_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub category: String,
    pub website: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSection {
    pub description: String,
    pub place_id: String,
    pub google_rating: f64,
    pub google_review_count: u32,
    pub working_hours: Option<WorkingHours>,
    #[serde(rename = "googleReviewsJSON")]
    pub google_reviews_json: Option<serde_json::Value>,
    pub icon_url: String,
}

/// Builds the payload for `POST /clinic-management/submissions`.
///
/// Text is trimmed. Unnamed providers and procedures are dropped since the
/// API rejects them.
#[must_use]
pub fn build_submission(draft: &Draft, submitter_key: &str) -> SubmissionPayload {
    let text = |s: &str| s.trim().to_string();

    SubmissionPayload {
        submitter_key: submitter_key.to_string(),
        flow: draft.submission_flow,
        existing_clinic_id: draft.existing_clinic_id,
        clinic: ClinicSection {
            clinic_name: text(&draft.clinic_name),
            address: text(&draft.address),
            city: text(&draft.city),
            state: text(&draft.state),
            zip_code: text(&draft.zip_code),
            category: text(&draft.category),
            website: text(&draft.website),
            phone: text(&draft.phone),
            email: text(&draft.email),
        },
        advanced: AdvancedSection {
            description: text(&draft.description),
            place_id: text(&draft.place_id),
            google_rating: draft.google_rating,
            google_review_count: draft.google_review_count,
            working_hours: draft.working_hours.clone(),
            google_reviews_json: draft.google_reviews_json.clone(),
            icon_url: text(&draft.icon_url),
        },
        providers: draft
            .providers
            .iter()
            .filter(|p| !p.provider_name.trim().is_empty())
            .cloned()
            .collect(),
        procedures: draft
            .procedures
            .iter()
            .filter(|p| !p.procedure_name.trim().is_empty())
            .cloned()
            .collect(),
        photos: draft
            .photos
            .iter()
            .filter(|p| p.source == PhotoSource::User)
            .cloned()
            .collect(),
    }
}
