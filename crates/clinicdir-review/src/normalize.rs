//! Normalization from raw draft, clinic, and deleted-clinic payloads into
//! the canonical [`Draft`] and [`ExistingClinic`] shapes.
//!
//! Key aliases and lenient value parsing live in [`crate::fields`]; this
//! module owns the per-source mapping rules. Every output satisfies the
//! canonical defaults no matter which fields the input lacks. Only a
//! payload that is not a JSON object is rejected.

use chrono::{DateTime, NaiveDateTime, Utc};
use clinicdir_core::{
    DeletedClinicSummary, Draft, ExistingClinic, Photo, PhotoSource, PhotoType, Procedure,
    Provider, SubmissionFlow,
};
use serde_json::Value;

use crate::error::ReviewError;
use crate::fields::{alias, Fields};

/// Where a raw payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A draft from `GET /drafts/{id}`.
    SubmittedDraft,
    /// A published clinic from `GET /clinics/{id}` being edited.
    LiveClinic,
    /// A soft-deleted clinic summary being restored.
    DeletedClinic,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::SubmittedDraft => write!(f, "submitted draft"),
            SourceKind::LiveClinic => write!(f, "live clinic"),
            SourceKind::DeletedClinic => write!(f, "deleted clinic"),
        }
    }
}

/// Normalizes a raw payload of the given [`SourceKind`] into a [`Draft`].
///
/// # Errors
///
/// Returns [`ReviewError::MalformedInput`] if `raw` is not a JSON object.
pub fn normalize(raw: &Value, kind: SourceKind) -> Result<Draft, ReviewError> {
    let fields = object(raw, kind)?;
    Ok(match kind {
        SourceKind::SubmittedDraft => draft_from(fields),
        SourceKind::LiveClinic => clinic_from(fields).to_draft(),
        SourceKind::DeletedClinic => deleted_from(fields),
    })
}

/// Normalizes a raw clinic record into an [`ExistingClinic`].
///
/// Photos embedded in the record are kept; photos served from the separate
/// photos endpoint are attached with [`normalize_photos`].
///
/// # Errors
///
/// Returns [`ReviewError::MalformedInput`] if `raw` is not a JSON object.
pub fn normalize_clinic(raw: &Value) -> Result<ExistingClinic, ReviewError> {
    object(raw, SourceKind::LiveClinic).map(clinic_from)
}

/// Normalizes a list of raw photo records. Non-object entries are skipped.
#[must_use]
pub fn normalize_photos(raw_photos: &[Value]) -> Vec<Photo> {
    raw_photos
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| Fields::new(raw).map(|f| photo_from(f, idx)))
        .collect()
}

/// Normalizes one row of the deleted-clinic listing.
///
/// # Errors
///
/// Returns [`ReviewError::MalformedInput`] if `raw` is not a JSON object.
pub fn normalize_deleted_summary(raw: &Value) -> Result<DeletedClinicSummary, ReviewError> {
    let fields = object(raw, SourceKind::DeletedClinic)?;
    Ok(DeletedClinicSummary {
        clinic_id: fields.integer(alias::CLINIC_ID).unwrap_or_default(),
        deleted_at: fields
            .opt_text(alias::DELETED_AT)
            .and_then(|s| parse_timestamp(&s)),
        draft: deleted_from(fields),
    })
}

/// Splits a free-text US address into `(city, state, zip)`.
///
/// The second-to-last comma segment is the city; the last segment's first
/// and second whitespace tokens are the state and zip. Addresses with fewer
/// than two segments yield empty parts.
#[must_use]
pub fn split_address(address: &str) -> (String, String, String) {
    let segments: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let [.., city, tail] = segments.as_slice() else {
        return (String::new(), String::new(), String::new());
    };

    let mut tokens = tail.split_whitespace();
    let state = tokens.next().unwrap_or_default();
    let zip = tokens.next().unwrap_or_default();
    ((*city).to_string(), state.to_string(), zip.to_string())
}

fn object(raw: &Value, kind: SourceKind) -> Result<Fields<'_>, ReviewError> {
    Fields::new(raw).ok_or_else(|| ReviewError::MalformedInput {
        kind,
        reason: format!("expected a JSON object, got {}", json_type(raw)),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn draft_from(f: Fields<'_>) -> Draft {
    Draft {
        draft_id: f.integer(alias::DRAFT_ID),
        existing_clinic_id: f.integer(alias::EXISTING_CLINIC_ID),
        clinic_name: f.text(alias::CLINIC_NAME),
        address: f.text(alias::ADDRESS),
        city: f.text(alias::CITY),
        state: f.text(alias::STATE),
        zip_code: f.text(alias::ZIP_CODE),
        category: f.text(alias::CATEGORY),
        website: f.text(alias::WEBSITE),
        phone: f.text(alias::PHONE),
        email: f.text(alias::EMAIL),
        description: f.text(alias::DESCRIPTION),
        place_id: f.text(alias::PLACE_ID),
        google_rating: f.number(alias::GOOGLE_RATING).unwrap_or_default(),
        google_review_count: f.count(alias::GOOGLE_REVIEW_COUNT),
        google_reviews_json: f.json(alias::GOOGLE_REVIEWS_JSON, "googleReviewsJSON"),
        working_hours: f.working_hours(alias::WORKING_HOURS),
        icon_url: f.text(alias::ICON_URL),
        submission_flow: f
            .opt_text(alias::SUBMISSION_FLOW)
            .and_then(|s| SubmissionFlow::parse(&s))
            .unwrap_or_default(),
        providers: providers_from(f),
        procedures: procedures_from(f),
        photos: normalize_photos(f.list(alias::PHOTOS)),
    }
}

fn clinic_from(f: Fields<'_>) -> ExistingClinic {
    let icon_url = f
        .opt_text(alias::LOGO)
        .or_else(|| f.opt_text(alias::PHOTO))
        .or_else(|| f.opt_text(alias::ICON_URL))
        .unwrap_or_default();

    ExistingClinic {
        id: f.integer(alias::CLINIC_ID).unwrap_or_default(),
        clinic_name: f.text(alias::CLINIC_NAME),
        address: f.text(alias::ADDRESS),
        city: f.text(alias::CITY),
        state: f.text(alias::STATE),
        zip_code: f.text(alias::ZIP_CODE),
        category: f.text(alias::CATEGORY),
        website: f.text(alias::WEBSITE),
        phone: f.text(alias::PHONE),
        email: f.text(alias::EMAIL),
        description: f.text(alias::DESCRIPTION),
        place_id: f.text(alias::PLACE_ID),
        google_rating: f.number(alias::GOOGLE_RATING).unwrap_or_default(),
        google_review_count: f.count(alias::GOOGLE_REVIEW_COUNT),
        google_reviews_json: f.json(alias::GOOGLE_REVIEWS_JSON, "googleReviewsJSON"),
        working_hours: f.working_hours(alias::WORKING_HOURS),
        icon_url,
        providers: providers_from(f),
        procedures: procedures_from(f),
        photos: normalize_photos(f.list(alias::PHOTOS)),
    }
}

fn deleted_from(f: Fields<'_>) -> Draft {
    let address = f.text(alias::ADDRESS);
    let (city, state, zip_code) = split_address(&address);

    // Explicit location fields win when the listing happens to carry them.
    let city = f.opt_text(alias::CITY).unwrap_or(city);
    let state = f.opt_text(alias::STATE).unwrap_or(state);
    let zip_code = f.opt_text(alias::ZIP_CODE).unwrap_or(zip_code);

    Draft {
        draft_id: None,
        existing_clinic_id: f.integer(alias::CLINIC_ID),
        clinic_name: f.text(alias::CLINIC_NAME),
        address,
        city,
        state,
        zip_code,
        category: f.text(alias::CATEGORY),
        website: f.text(alias::WEBSITE),
        phone: f.text(alias::PHONE),
        email: f.text(alias::EMAIL),
        description: f.text(alias::DESCRIPTION),
        place_id: f.text(alias::PLACE_ID),
        google_rating: f.number(alias::GOOGLE_RATING).unwrap_or_default(),
        google_review_count: f.count(alias::GOOGLE_REVIEW_COUNT),
        google_reviews_json: f.json(alias::GOOGLE_REVIEWS_JSON, "googleReviewsJSON"),
        working_hours: f.working_hours(alias::WORKING_HOURS),
        icon_url: f
            .opt_text(alias::ICON_URL)
            .or_else(|| f.opt_text(alias::LOGO))
            .unwrap_or_default(),
        submission_flow: SubmissionFlow::AddToExisting,
        providers: Vec::new(),
        procedures: Vec::new(),
        photos: Vec::new(),
    }
}

fn providers_from(f: Fields<'_>) -> Vec<Provider> {
    f.list(alias::PROVIDERS)
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let p = Fields::new(raw)?;
            Some(Provider {
                id: p
                    .id(alias::PROVIDER_ID)
                    .unwrap_or_else(|| format!("existing-provider-{idx}")),
                provider_name: p.text(alias::PROVIDER_NAME),
                photo_url: p.opt_text(alias::PROVIDER_PHOTO),
            })
        })
        .collect()
}

/// Reads procedures from either a flat list or a `{ category: [..] }` map.
///
/// Grouped entries are tagged with their group key as category, unless the
/// entry names its own category.
fn procedures_from(f: Fields<'_>) -> Vec<Procedure> {
    let grouped: Vec<(Option<&str>, &Value)> = match f.value(alias::PROCEDURES) {
        Some(Value::Array(items)) => items.iter().map(|raw| (None, raw)).collect(),
        Some(Value::Object(groups)) => groups
            .iter()
            .flat_map(|(category, items)| {
                items
                    .as_array()
                    .map_or(&[][..], Vec::as_slice)
                    .iter()
                    .map(move |raw| (Some(category.as_str()), raw))
            })
            .collect(),
        _ => Vec::new(),
    };

    grouped
        .into_iter()
        .enumerate()
        .filter_map(|(idx, (group, raw))| {
            let p = Fields::new(raw)?;
            let category = p
                .opt_text(alias::CATEGORY)
                .or_else(|| group.map(str::to_string))
                .unwrap_or_default();
            Some(Procedure {
                id: p
                    .id(alias::PROCEDURE_ID)
                    .unwrap_or_else(|| format!("existing-procedure-{idx}")),
                procedure_name: p.text(alias::PROCEDURE_NAME),
                category,
                price_min: p.number(alias::PRICE_MIN),
                price_max: p.number(alias::PRICE_MAX),
                price_unit: p.opt_text(alias::PRICE_UNIT),
                average_price: p.number(alias::AVERAGE_PRICE),
                provider_names: provider_names_from(p),
            })
        })
        .collect()
}

/// Provider names arrive as plain strings or as provider objects.
fn provider_names_from(p: Fields<'_>) -> Vec<String> {
    p.list(alias::PROVIDER_NAMES)
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(_) => Fields::new(v)?
                .opt_text(alias::PROVIDER_NAME)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn photo_from(p: Fields<'_>, idx: usize) -> Photo {
    Photo {
        id: p
            .id(alias::PHOTO_ID)
            .unwrap_or_else(|| format!("existing-photo-{idx}")),
        photo_url: p.text(alias::PHOTO_URL),
        photo_data: p.opt_text(alias::PHOTO_DATA),
        source: p
            .opt_text(alias::PHOTO_SOURCE)
            .and_then(|s| PhotoSource::parse(&s))
            .unwrap_or_default(),
        is_primary: p.flag(alias::IS_PRIMARY),
        photo_type: p
            .opt_text(alias::PHOTO_TYPE)
            .and_then(|s| PhotoType::parse(&s)),
        file_name: p.opt_text(alias::FILE_NAME),
        mime_type: p.opt_text(alias::MIME_TYPE),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
        .or_else(|| {
            tracing::debug!(raw, "unrecognized deletedAt timestamp");
            None
        })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
