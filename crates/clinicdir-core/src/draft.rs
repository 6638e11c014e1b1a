use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opening hours keyed by day name, e.g. `"Monday" -> "9:00 AM - 5:00 PM"`.
/// A closed day carries the literal value `"Closed"`.
pub type WorkingHours = BTreeMap<String, String>;

/// Which moderation path a draft follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionFlow {
    /// A brand-new clinic listing.
    #[default]
    New,
    /// An adjustment draft proposing changes to a published clinic.
    AddToExisting,
}

impl SubmissionFlow {
    /// Parses the wire value, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "add_to_existing" | "add-to-existing" | "addtoexisting" => Some(Self::AddToExisting),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::AddToExisting => "add_to_existing",
        }
    }
}

/// Where a photo came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSource {
    #[default]
    User,
    Google,
}

impl PhotoSource {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    Logo,
    Icon,
    Gallery,
}

impl PhotoType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "logo" => Some(Self::Logo),
            "icon" => Some(Self::Icon),
            "gallery" => Some(Self::Gallery),
            _ => None,
        }
    }

    /// `true` for the types that can stand in as the clinic's display logo.
    #[must_use]
    pub fn is_brand_mark(self) -> bool {
        matches!(self, Self::Logo | Self::Icon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Draft-local id (`existing-provider-<n>`) or the clinic API's provider id.
    pub id: String,
    /// May be empty; an empty name never matches another provider.
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,
    pub procedure_name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    /// Free-text unit such as `"per unit"` or `"per session"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub provider_names: Vec<String>,
}

impl Procedure {
    /// Returns the `(min, max)` range shown to users.
    ///
    /// Stored bounds win when positive; otherwise both bounds fall back to
    /// `average_price`. Returns `None` when no positive price is known.
    #[must_use]
    pub fn display_range(&self) -> Option<(f64, f64)> {
        let avg = positive(self.average_price);
        let min = positive(self.price_min).or(avg);
        let max = positive(self.price_max).or(avg);
        match (min, max) {
            (Some(min), Some(max)) => Some((min, max)),
            (Some(only), None) | (None, Some(only)) => Some((only, only)),
            (None, None) => None,
        }
    }
}

/// Treats `0`, negatives, and `NaN` as missing.
#[must_use]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// Remote URL; empty for a fresh upload that only carries `photo_data`.
    pub photo_url: String,
    /// Inline base64 image body from an upload form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data: Option<String>,
    pub source: PhotoSource,
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_type: Option<PhotoType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Photo {
    /// The URL a viewer should load: the remote URL, else the inline data.
    #[must_use]
    pub fn display_url(&self) -> Option<&str> {
        let url = self.photo_url.trim();
        if !url.is_empty() {
            return Some(url);
        }
        self.photo_data
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// The canonical clinic draft every review component operates on.
///
/// Every scalar is always present: text defaults to `""`, numbers to `0`,
/// structured JSON to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub draft_id: Option<i64>,
    /// The published clinic an adjustment draft targets.
    pub existing_clinic_id: Option<i64>,
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
    pub submission_flow: SubmissionFlow,
    pub providers: Vec<Provider>,
    pub procedures: Vec<Procedure>,
    pub photos: Vec<Photo>,
}

impl Draft {
    #[must_use]
    pub fn is_adjustment(&self) -> bool {
        self.submission_flow == SubmissionFlow::AddToExisting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(min: Option<f64>, max: Option<f64>, avg: Option<f64>) -> Procedure {
        Procedure {
            id: "p-1".to_string(),
            procedure_name: "Botox".to_string(),
            price_min: min,
            price_max: max,
            average_price: avg,
            ..Procedure::default()
        }
    }

    #[test]
    fn display_range_prefers_stored_bounds() {
        let p = procedure(Some(100.0), Some(200.0), Some(150.0));
        assert_eq!(p.display_range(), Some((100.0, 200.0)));
    }

    #[test]
    fn display_range_falls_back_to_average() {
        let p = procedure(None, Some(0.0), Some(150.0));
        assert_eq!(p.display_range(), Some((150.0, 150.0)));
    }

    #[test]
    fn display_range_none_without_prices() {
        assert_eq!(procedure(None, None, Some(0.0)).display_range(), None);
    }

    #[test]
    fn submission_flow_parses_wire_values() {
        assert_eq!(
            SubmissionFlow::parse("add_to_existing"),
            Some(SubmissionFlow::AddToExisting)
        );
        assert_eq!(SubmissionFlow::parse(" NEW "), Some(SubmissionFlow::New));
        assert_eq!(SubmissionFlow::parse("merge"), None);
    }

    #[test]
    fn draft_serializes_camel_case_keys() {
        let draft = Draft {
            zip_code: "80202".to_string(),
            submission_flow: SubmissionFlow::AddToExisting,
            ..Draft::default()
        };
        let json = serde_json::to_value(&draft).expect("serialize draft");
        assert_eq!(json["zipCode"], "80202");
        assert_eq!(json["submissionFlow"], "add_to_existing");
        assert!(json["googleReviewsJSON"].is_null());
        assert_eq!(json["googleRating"], 0.0);
    }

    #[test]
    fn display_url_falls_back_to_inline_data() {
        let photo = Photo {
            photo_data: Some("data:image/png;base64,AAAA".to_string()),
            ..Photo::default()
        };
        assert_eq!(photo.display_url(), Some("data:image/png;base64,AAAA"));
        assert_eq!(Photo::default().display_url(), None);
    }
}
