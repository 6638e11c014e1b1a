//! Alias table and lenient value readers for raw clinic API payloads.
//!
//! The clinic API, the draft store, and the deleted-clinic listing spell the
//! same field several ways (`clinicName`, `ClinicName`, `clinic_name`,
//! `name`). Each constant in [`alias`] lists the accepted keys for one
//! canonical field in priority order. Nothing outside [`crate::normalize`]
//! looks at raw key names.
//!
//! Readers never fail. A missing key, a `null`, or a value of the wrong JSON
//! type reads as absent so the normalizer can apply its defaults.

use clinicdir_core::WorkingHours;
use serde_json::{Map, Value};

pub(crate) mod alias {
    pub const DRAFT_ID: &[&str] = &["draftId", "DraftID", "draft_id", "id"];
    pub const CLINIC_ID: &[&str] = &["id", "clinicId", "ClinicID", "clinic_id"];
    pub const EXISTING_CLINIC_ID: &[&str] = &[
        "existingClinicId",
        "ExistingClinicID",
        "existing_clinic_id",
        "clinicId",
    ];

    pub const CLINIC_NAME: &[&str] = &["clinicName", "ClinicName", "clinic_name", "name"];
    pub const ADDRESS: &[&str] = &["address", "Address", "fullAddress", "full_address"];
    pub const CITY: &[&str] = &["city", "City"];
    pub const STATE: &[&str] = &["state", "State"];
    pub const ZIP_CODE: &[&str] = &["zipCode", "ZipCode", "zip_code", "zip", "postalCode"];
    pub const CATEGORY: &[&str] = &["category", "Category"];
    pub const WEBSITE: &[&str] = &["website", "Website"];
    pub const PHONE: &[&str] = &["phone", "Phone"];
    pub const EMAIL: &[&str] = &["email", "Email"];
    pub const DESCRIPTION: &[&str] = &["description", "Description"];
    pub const PLACE_ID: &[&str] = &["placeId", "PlaceID", "place_id"];
    pub const GOOGLE_RATING: &[&str] = &["googleRating", "GoogleRating", "google_rating", "rating"];
    pub const GOOGLE_REVIEW_COUNT: &[&str] = &[
        "googleReviewCount",
        "GoogleReviewCount",
        "google_review_count",
        "reviewCount",
    ];
    pub const GOOGLE_REVIEWS_JSON: &[&str] = &[
        "googleReviewsJSON",
        "GoogleReviewsJSON",
        "googleReviewsJson",
        "google_reviews_json",
    ];
    pub const WORKING_HOURS: &[&str] = &["workingHours", "WorkingHours", "working_hours"];
    pub const ICON_URL: &[&str] = &["iconUrl", "IconURL", "icon_url"];
    pub const LOGO: &[&str] = &["logo", "Logo", "logoUrl"];
    pub const PHOTO: &[&str] = &["photo", "Photo"];
    pub const SUBMISSION_FLOW: &[&str] = &["submissionFlow", "SubmissionFlow", "submission_flow", "flow"];
    pub const DELETED_AT: &[&str] = &["deletedAt", "DeletedAt", "deleted_at"];

    pub const PROVIDERS: &[&str] = &["providers", "Providers"];
    pub const PROCEDURES: &[&str] = &["procedures", "Procedures"];
    pub const PHOTOS: &[&str] = &["photos", "Photos"];

    pub const PROVIDER_ID: &[&str] = &["id", "providerId", "ProviderID", "provider_id"];
    pub const PROVIDER_NAME: &[&str] = &["providerName", "ProviderName", "provider_name", "name"];
    pub const PROVIDER_PHOTO: &[&str] = &["photoUrl", "PhotoURL", "photo_url", "photo"];

    pub const PROCEDURE_ID: &[&str] = &["id", "procedureId", "ProcedureID", "procedure_id"];
    pub const PROCEDURE_NAME: &[&str] = &[
        "procedureName",
        "ProcedureName",
        "procedure_name",
        "name",
        "procedure",
    ];
    pub const PRICE_MIN: &[&str] = &["priceMin", "PriceMin", "price_min", "minPrice"];
    pub const PRICE_MAX: &[&str] = &["priceMax", "PriceMax", "price_max", "maxPrice"];
    pub const PRICE_UNIT: &[&str] = &["priceUnit", "PriceUnit", "price_unit", "unit"];
    pub const AVERAGE_PRICE: &[&str] = &["averagePrice", "AveragePrice", "average_price", "price"];
    pub const PROVIDER_NAMES: &[&str] = &["providerNames", "ProviderNames", "provider_names"];

    pub const PHOTO_ID: &[&str] = &["id", "photoId", "PhotoID", "photo_id"];
    pub const PHOTO_URL: &[&str] = &["photoUrl", "PhotoURL", "photo_url", "url"];
    pub const PHOTO_DATA: &[&str] = &["photoData", "photo_data", "data"];
    pub const PHOTO_SOURCE: &[&str] = &["source", "Source"];
    pub const IS_PRIMARY: &[&str] = &["isPrimary", "IsPrimary", "is_primary"];
    pub const PHOTO_TYPE: &[&str] = &["photoType", "PhotoType", "photo_type", "type"];
    pub const FILE_NAME: &[&str] = &["fileName", "file_name"];
    pub const MIME_TYPE: &[&str] = &["mimeType", "mime_type"];
}

/// Read-only view over one raw JSON object.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|map| Self { map })
    }

    /// First alias whose value is present and not `null`.
    pub(crate) fn value(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find(|v| !v.is_null())
    }

    pub(crate) fn text(&self, aliases: &[&str]) -> String {
        self.value(aliases).and_then(value_as_text).unwrap_or_default()
    }

    /// Like [`Fields::text`] but treats blank text as absent.
    pub(crate) fn opt_text(&self, aliases: &[&str]) -> Option<String> {
        self.value(aliases)
            .and_then(value_as_text)
            .filter(|s| !s.trim().is_empty())
    }

    pub(crate) fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.value(aliases).and_then(value_as_number)
    }

    pub(crate) fn integer(&self, aliases: &[&str]) -> Option<i64> {
        match self.value(aliases)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Non-negative count; fractional values are rounded, negatives clamp to zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn count(&self, aliases: &[&str]) -> u32 {
        self.number(aliases)
            .filter(|n| n.is_finite())
            .map_or(0, |n| n.round().clamp(0.0, f64::from(u32::MAX)) as u32)
    }

    pub(crate) fn flag(&self, aliases: &[&str]) -> bool {
        match self.value(aliases) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
            _ => false,
        }
    }

    /// Ids may arrive as numbers or strings; blank strings read as absent.
    pub(crate) fn id(&self, aliases: &[&str]) -> Option<String> {
        self.opt_text(aliases).map(|s| s.trim().to_string())
    }

    /// The list under the first matching alias, or an empty slice.
    pub(crate) fn list(&self, aliases: &[&str]) -> &'a [Value] {
        self.value(aliases)
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Structured JSON that may arrive either inline or as JSON text.
    ///
    /// Unparseable text is logged and read as absent.
    pub(crate) fn json(&self, aliases: &[&str], field: &'static str) -> Option<Value> {
        match self.value(aliases)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(parsed) if parsed.is_object() || parsed.is_array() => Some(parsed),
                Ok(_) => {
                    tracing::warn!(field, "structured field is not an object or array; ignoring");
                    None
                }
                Err(e) => {
                    tracing::warn!(field, error = %e, "failed to parse structured field; ignoring");
                    None
                }
            },
            v @ (Value::Object(_) | Value::Array(_)) => Some(v.clone()),
            _ => None,
        }
    }

    pub(crate) fn working_hours(&self, aliases: &[&str]) -> Option<WorkingHours> {
        self.json(aliases, "workingHours").map(|v| working_hours_from(&v))
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Accepts either a `{ "Monday": "9-5" }` object or a Google-style
/// `["Monday: 9:00 AM - 5:00 PM", ...]` list.
fn working_hours_from(value: &Value) -> WorkingHours {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(day, hours)| hours.as_str().map(|h| (day.clone(), h.to_string())))
            .collect(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|line| line.split_once(':'))
            .map(|(day, hours)| (day.trim().to_string(), hours.trim().to_string()))
            .collect(),
        _ => WorkingHours::new(),
    }
}
