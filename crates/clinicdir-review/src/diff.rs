//! Change-set computation between a draft and its published clinic.

use std::collections::HashSet;

use clinicdir_core::{Draft, ExistingClinic, Photo, PhotoSource, Procedure, Provider};
use serde::Serialize;

use crate::placeholder::is_placeholder;
use crate::reconcile::{normalize_name, normalize_url};

/// The clinic fields a moderator reviews, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffField {
    ClinicName,
    Address,
    City,
    State,
    ZipCode,
    Phone,
    Website,
    Email,
    Category,
    GoogleRating,
    GoogleReviewCount,
}

impl DiffField {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DiffField::ClinicName => "Clinic Name",
            DiffField::Address => "Address",
            DiffField::City => "City",
            DiffField::State => "State",
            DiffField::ZipCode => "ZIP Code",
            DiffField::Phone => "Phone",
            DiffField::Website => "Website",
            DiffField::Email => "Email",
            DiffField::Category => "Category",
            DiffField::GoogleRating => "Google Rating",
            DiffField::GoogleReviewCount => "Google Review Count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The clinic had a value and the draft proposes a different one.
    Changed,
    /// The clinic had no value (empty or zero).
    Added,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: DiffField,
    pub label: &'static str,
    pub previous: FieldValue,
    pub proposed: FieldValue,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub field_changes: Vec<FieldChange>,
    pub new_providers: Vec<Provider>,
    pub new_procedures: Vec<Procedure>,
    pub new_photos: Vec<Photo>,
    pub google_photos_changed: bool,
    /// `false` means callers show "no changes detected" instead of an empty diff.
    pub has_changes: bool,
}

/// Computes what `draft` would change on `existing`.
#[must_use]
pub fn compute_diff(draft: &Draft, existing: &ExistingClinic) -> DiffResult {
    let mut field_changes: Vec<FieldChange> = [
        (DiffField::ClinicName, &draft.clinic_name, &existing.clinic_name),
        (DiffField::Address, &draft.address, &existing.address),
        (DiffField::City, &draft.city, &existing.city),
        (DiffField::State, &draft.state, &existing.state),
        (DiffField::ZipCode, &draft.zip_code, &existing.zip_code),
        (DiffField::Phone, &draft.phone, &existing.phone),
        (DiffField::Website, &draft.website, &existing.website),
        (DiffField::Email, &draft.email, &existing.email),
        (DiffField::Category, &draft.category, &existing.category),
    ]
    .into_iter()
    .filter_map(|(field, proposed, previous)| text_change(field, proposed, previous))
    .collect();

    field_changes.extend(number_change(
        DiffField::GoogleRating,
        draft.google_rating,
        existing.google_rating,
    ));
    field_changes.extend(number_change(
        DiffField::GoogleReviewCount,
        f64::from(draft.google_review_count),
        f64::from(existing.google_review_count),
    ));

    let new_providers = unmatched(&draft.providers, &existing.providers, |p| {
        normalize_name(&p.provider_name)
    });
    let new_procedures = unmatched(&draft.procedures, &existing.procedures, |p| {
        normalize_name(&p.procedure_name)
    });
    let new_photos = new_photos(&draft.photos, &existing.photos);
    let google_photos_changed = google_urls(&existing.photos) != google_urls(&draft.photos);

    let has_changes = !field_changes.is_empty()
        || !new_providers.is_empty()
        || !new_procedures.is_empty()
        || !new_photos.is_empty()
        || google_photos_changed;

    DiffResult {
        field_changes,
        new_providers,
        new_procedures,
        new_photos,
        google_photos_changed,
        has_changes,
    }
}

fn text_change(field: DiffField, proposed: &str, previous: &str) -> Option<FieldChange> {
    if is_placeholder(proposed) {
        return None;
    }
    let (proposed, previous) = (proposed.trim(), previous.trim());
    if proposed == previous {
        return None;
    }
    Some(FieldChange {
        field,
        label: field.label(),
        previous: FieldValue::Text(previous.to_string()),
        proposed: FieldValue::Text(proposed.to_string()),
        kind: if previous.is_empty() {
            ChangeKind::Added
        } else {
            ChangeKind::Changed
        },
    })
}

fn number_change(field: DiffField, proposed: f64, previous: f64) -> Option<FieldChange> {
    if (proposed - previous).abs() < f64::EPSILON {
        return None;
    }
    Some(FieldChange {
        field,
        label: field.label(),
        previous: FieldValue::Number(previous),
        proposed: FieldValue::Number(proposed),
        kind: if previous == 0.0 {
            ChangeKind::Added
        } else {
            ChangeKind::Changed
        },
    })
}

/// Draft items with a key that no existing item shares. Keyless draft items
/// carry no name to show and are left out.
fn unmatched<T, F>(draft: &[T], existing: &[T], key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<String>,
{
    let known: HashSet<String> = existing.iter().filter_map(&key).collect();
    draft
        .iter()
        .filter(|item| key(*item).is_some_and(|k| !known.contains(&k)))
        .cloned()
        .collect()
}

/// Draft photos whose URL is not on the clinic under any source. A fresh
/// upload without a URL but with inline data always counts as new.
fn new_photos(draft: &[Photo], existing: &[Photo]) -> Vec<Photo> {
    let known: HashSet<String> = existing
        .iter()
        .filter_map(|p| normalize_url(&p.photo_url))
        .collect();
    draft
        .iter()
        .filter(|photo| match normalize_url(&photo.photo_url) {
            Some(url) => !known.contains(&url),
            None => photo
                .photo_data
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty()),
        })
        .cloned()
        .collect()
}

/// Sorted, trimmed Google photo URLs. Duplicates are kept.
fn google_urls(photos: &[Photo]) -> Vec<String> {
    let mut urls: Vec<String> = photos
        .iter()
        .filter(|p| p.source == PhotoSource::Google)
        .map(|p| p.photo_url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    urls.sort();
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google(url: &str) -> Photo {
        Photo {
            id: url.to_string(),
            photo_url: url.to_string(),
            source: PhotoSource::Google,
            ..Photo::default()
        }
    }

    fn user(url: &str) -> Photo {
        Photo {
            id: url.to_string(),
            photo_url: url.to_string(),
            source: PhotoSource::User,
            ..Photo::default()
        }
    }

    fn existing() -> ExistingClinic {
        ExistingClinic {
            id: 301,
            clinic_name: "Acme Clinic".to_string(),
            address: "1 Acme Way".to_string(),
            city: "Springfield".to_string(),
            google_rating: 4.2,
            google_review_count: 40,
            providers: vec![Provider {
                id: "88".to_string(),
                provider_name: "Amy Chen".to_string(),
                photo_url: None,
            }],
            procedures: vec![Procedure {
                id: "12".to_string(),
                procedure_name: "Botox".to_string(),
                ..Procedure::default()
            }],
            photos: vec![google("https://maps.test/a.jpg"), google("https://maps.test/b.jpg")],
            ..ExistingClinic::default()
        }
    }

    #[test]
    fn identical_records_have_no_changes() {
        let clinic = existing();
        let diff = compute_diff(&clinic.to_draft(), &clinic);
        assert!(!diff.has_changes, "unexpected diff: {diff:?}");
        assert_eq!(diff, DiffResult::default());
    }

    #[test]
    fn text_changes_are_classified() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.clinic_name = "  Acme Clinic & Spa ".to_string();
        draft.email = "hello@acme.test".to_string();
        let diff = compute_diff(&draft, &clinic);
        assert_eq!(diff.field_changes.len(), 2);
        assert_eq!(diff.field_changes[0].field, DiffField::ClinicName);
        assert_eq!(diff.field_changes[0].kind, ChangeKind::Changed);
        assert_eq!(
            diff.field_changes[0].proposed,
            FieldValue::Text("Acme Clinic & Spa".to_string())
        );
        assert_eq!(diff.field_changes[1].field, DiffField::Email);
        assert_eq!(diff.field_changes[1].kind, ChangeKind::Added);
        assert!(diff.has_changes);
    }

    #[test]
    fn placeholder_and_blank_text_are_skipped() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.clinic_name = "N/A".to_string();
        draft.address = String::new();
        draft.city = "existing clinic update".to_string();
        assert!(!compute_diff(&draft, &clinic).has_changes);
    }

    #[test]
    fn whitespace_only_differences_are_ignored() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.address = " 1 Acme Way  ".to_string();
        assert!(compute_diff(&draft, &clinic).field_changes.is_empty());
    }

    #[test]
    fn numeric_changes_compare_as_numbers() {
        let mut clinic = existing();
        clinic.google_review_count = 0;
        let mut draft = clinic.to_draft();
        draft.google_rating = 4.8;
        draft.google_review_count = 51;
        let diff = compute_diff(&draft, &clinic);
        assert_eq!(diff.field_changes.len(), 2);
        assert_eq!(diff.field_changes[0].field, DiffField::GoogleRating);
        assert_eq!(diff.field_changes[0].kind, ChangeKind::Changed);
        assert_eq!(diff.field_changes[1].field, DiffField::GoogleReviewCount);
        assert_eq!(diff.field_changes[1].kind, ChangeKind::Added);
    }

    #[test]
    fn new_list_items_are_detected_case_insensitively() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.providers.push(Provider {
            id: "existing-provider-1".to_string(),
            provider_name: "AMY CHEN".to_string(),
            photo_url: None,
        });
        draft.providers.push(Provider {
            id: "existing-provider-2".to_string(),
            provider_name: "Sam Lee".to_string(),
            photo_url: None,
        });
        draft.procedures.push(Procedure {
            id: "existing-procedure-1".to_string(),
            procedure_name: "Filler".to_string(),
            ..Procedure::default()
        });
        let diff = compute_diff(&draft, &clinic);
        assert_eq!(diff.new_providers.len(), 1);
        assert_eq!(diff.new_providers[0].provider_name, "Sam Lee");
        assert_eq!(diff.new_procedures.len(), 1);
        assert_eq!(diff.new_procedures[0].procedure_name, "Filler");
    }

    #[test]
    fn new_photos_match_across_sources() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.photos.push(user("https://maps.test/a.jpg"));
        draft.photos.push(user("https://cdn.test/new.jpg"));
        draft.photos.push(Photo {
            id: "upload".to_string(),
            photo_data: Some("data:image/png;base64,AAAA".to_string()),
            ..Photo::default()
        });
        let diff = compute_diff(&draft, &clinic);
        let ids: Vec<&str> = diff.new_photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["https://cdn.test/new.jpg", "upload"]);
        assert!(!diff.google_photos_changed);
    }

    #[test]
    fn reordered_google_photos_are_unchanged() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.photos.reverse();
        let diff = compute_diff(&draft, &clinic);
        assert!(!diff.google_photos_changed);
        assert!(!diff.has_changes);
    }

    #[test]
    fn removed_google_photo_flags_change() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.photos.pop();
        let diff = compute_diff(&draft, &clinic);
        assert!(diff.google_photos_changed);
        assert!(diff.has_changes);
        assert!(diff.new_photos.is_empty());
    }

    #[test]
    fn diff_serializes_camel_case() {
        let clinic = existing();
        let mut draft = clinic.to_draft();
        draft.phone = "555-0199".to_string();
        let json = serde_json::to_value(compute_diff(&draft, &clinic)).unwrap();
        assert_eq!(json["hasChanges"], true);
        assert_eq!(json["fieldChanges"][0]["field"], "phone");
        assert_eq!(json["fieldChanges"][0]["kind"], "added");
        assert_eq!(json["fieldChanges"][0]["proposed"], "555-0199");
    }
}
