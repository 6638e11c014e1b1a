//! Field-by-field merge of an adjustment draft with its published clinic.

use clinicdir_core::{Draft, ExistingClinic};

use crate::placeholder::pick_text;
use crate::reconcile::reconcile_list;

/// Fills the draft's placeholder fields from `existing` and unions its
/// provider and procedure lists with the clinic's.
///
/// Text fields keep the draft value unless it is a placeholder. Numeric
/// fields keep a non-zero draft value, otherwise the clinic's value stands,
/// including a legitimate `0`. Photos are the draft's own. Neither input is
/// modified.
#[must_use]
pub fn merge_with_existing(draft: &Draft, existing: &ExistingClinic) -> Draft {
    let existing_id = (existing.id != 0).then_some(existing.id);

    Draft {
        draft_id: draft.draft_id,
        existing_clinic_id: draft.existing_clinic_id.or(existing_id),
        clinic_name: pick_text(&draft.clinic_name, &existing.clinic_name),
        address: pick_text(&draft.address, &existing.address),
        city: pick_text(&draft.city, &existing.city),
        state: pick_text(&draft.state, &existing.state),
        zip_code: pick_text(&draft.zip_code, &existing.zip_code),
        category: pick_text(&draft.category, &existing.category),
        website: pick_text(&draft.website, &existing.website),
        phone: pick_text(&draft.phone, &existing.phone),
        email: pick_text(&draft.email, &existing.email),
        description: pick_text(&draft.description, &existing.description),
        place_id: pick_text(&draft.place_id, &existing.place_id),
        google_rating: if draft.google_rating > 0.0 {
            draft.google_rating
        } else {
            existing.google_rating
        },
        google_review_count: if draft.google_review_count > 0 {
            draft.google_review_count
        } else {
            existing.google_review_count
        },
        google_reviews_json: draft
            .google_reviews_json
            .clone()
            .or_else(|| existing.google_reviews_json.clone()),
        working_hours: draft
            .working_hours
            .clone()
            .filter(|hours| !hours.is_empty())
            .or_else(|| existing.working_hours.clone()),
        icon_url: pick_text(&draft.icon_url, &existing.icon_url),
        submission_flow: draft.submission_flow,
        providers: reconcile_list(&draft.providers, &existing.providers).merged,
        procedures: reconcile_list(&draft.procedures, &existing.procedures).merged,
        photos: draft.photos.clone(),
    }
}
