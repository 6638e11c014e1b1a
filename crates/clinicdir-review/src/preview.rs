//! Read-only projections of a draft for the preview display.
//!
//! Every function here is total: missing data yields empty strings, empty
//! lists, or `None`, never an error.

use clinicdir_core::{Draft, Photo, PhotoSource, Procedure, Provider};
use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const UNCATEGORIZED: &str = "Other";

/// Which rating the published listing should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSource {
    #[default]
    Google,
    Manual,
}

/// Which photos the published listing should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSelection {
    User,
    Google,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOptions {
    pub rating_source: RatingSource,
    pub manual_rating: Option<f64>,
    pub manual_review_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub day: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewClinicInfo {
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
    pub rating: f64,
    pub review_count: u32,
    pub logo_url: Option<String>,
    pub working_hours: Vec<DayHours>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewProvider {
    pub id: String,
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewProcedure {
    pub id: String,
    pub name: String,
    /// `"$150"`, `"$100 - $200 per unit"`, or `None` when unpriced.
    pub display_price: Option<String>,
    pub provider_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureGroup {
    pub category: String,
    pub procedures: Vec<PreviewProcedure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPhoto {
    pub id: String,
    pub url: String,
    pub source: PhotoSource,
    pub is_primary: bool,
}

/// Everything the preview page renders for one draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub clinic: PreviewClinicInfo,
    pub providers: Vec<PreviewProvider>,
    pub procedures: Vec<ProcedureGroup>,
    pub photos: Vec<PreviewPhoto>,
}

#[must_use]
pub fn build_preview(draft: &Draft, rating: &RatingOptions, photos: PhotoSelection) -> Preview {
    Preview {
        clinic: to_preview_clinic_info(draft, rating),
        providers: to_preview_providers(&draft.providers),
        procedures: to_preview_procedures(&draft.procedures),
        photos: to_preview_photos(&draft.photos, photos),
    }
}

#[must_use]
pub fn to_preview_clinic_info(draft: &Draft, options: &RatingOptions) -> PreviewClinicInfo {
    let (rating, review_count) = match options.rating_source {
        RatingSource::Google => (draft.google_rating, draft.google_review_count),
        RatingSource::Manual => (
            options.manual_rating.unwrap_or_default(),
            options.manual_review_count.unwrap_or_default(),
        ),
    };

    let logo_url = draft
        .photos
        .iter()
        .filter(|p| p.photo_type.is_some_and(|t| t.is_brand_mark()))
        .find_map(Photo::display_url)
        .or_else(|| Some(draft.icon_url.trim()).filter(|url| !url.is_empty()))
        .map(str::to_string);

    PreviewClinicInfo {
        clinic_name: draft.clinic_name.trim().to_string(),
        address: draft.address.trim().to_string(),
        city: draft.city.trim().to_string(),
        state: draft.state.trim().to_string(),
        zip_code: draft.zip_code.trim().to_string(),
        category: draft.category.trim().to_string(),
        website: draft.website.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        email: draft.email.trim().to_string(),
        description: draft.description.trim().to_string(),
        rating,
        review_count,
        logo_url,
        working_hours: ordered_hours(draft),
    }
}

/// Weekdays first, Monday to Sunday, then any other keys in map order.
fn ordered_hours(draft: &Draft) -> Vec<DayHours> {
    let Some(hours) = &draft.working_hours else {
        return Vec::new();
    };
    let weekday_rank = |day: &str| -> usize {
        WEEKDAYS
            .iter()
            .position(|w| w.eq_ignore_ascii_case(day.trim()))
            .unwrap_or(WEEKDAYS.len())
    };

    let mut days: Vec<(&String, &String)> = hours.iter().collect();
    days.sort_by_key(|(day, _)| weekday_rank(day.as_str()));
    days.into_iter()
        .map(|(day, hours)| DayHours {
            day: day.clone(),
            hours: hours.clone(),
        })
        .collect()
}

/// Providers with a name, in list order.
#[must_use]
pub fn to_preview_providers(providers: &[Provider]) -> Vec<PreviewProvider> {
    providers
        .iter()
        .filter(|p| !p.provider_name.trim().is_empty())
        .map(|p| PreviewProvider {
            id: p.id.clone(),
            name: p.provider_name.trim().to_string(),
            photo_url: p
                .photo_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        })
        .collect()
}

/// Groups procedures by category in first-appearance order.
#[must_use]
pub fn to_preview_procedures(procedures: &[Procedure]) -> Vec<ProcedureGroup> {
    let mut groups: Vec<ProcedureGroup> = Vec::new();
    for procedure in procedures {
        if procedure.procedure_name.trim().is_empty() {
            continue;
        }
        let category = match procedure.category.trim() {
            "" => UNCATEGORIZED,
            other => other,
        };
        let entry = PreviewProcedure {
            id: procedure.id.clone(),
            name: procedure.procedure_name.trim().to_string(),
            display_price: display_price(procedure),
            provider_names: procedure.provider_names.clone(),
        };
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.procedures.push(entry),
            None => groups.push(ProcedureGroup {
                category: category.to_string(),
                procedures: vec![entry],
            }),
        }
    }
    groups
}

fn display_price(procedure: &Procedure) -> Option<String> {
    let (min, max) = procedure.display_range()?;
    let mut price = if (max - min).abs() < f64::EPSILON {
        format_money(min)
    } else {
        format!("{} - {}", format_money(min), format_money(max))
    };
    if let Some(unit) = procedure
        .price_unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        price.push(' ');
        price.push_str(unit);
    }
    Some(price)
}

/// `1500.0 -> "$1,500"`, `99.5 -> "$99.50"`.
#[allow(clippy::cast_possible_truncation)]
fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac == 0 {
        format!("${grouped}")
    } else {
        format!("${grouped}.{frac:02}")
    }
}

/// Photos with something to display, filtered by `selection`. `Both` lists
/// user photos before Google photos, each in original order.
#[must_use]
pub fn to_preview_photos(photos: &[Photo], selection: PhotoSelection) -> Vec<PreviewPhoto> {
    let from = |source: PhotoSource| {
        photos
            .iter()
            .filter(move |p| p.source == source)
            .filter_map(|p| {
                p.display_url().map(|url| PreviewPhoto {
                    id: p.id.clone(),
                    url: url.to_string(),
                    source: p.source,
                    is_primary: p.is_primary,
                })
            })
    };

    match selection {
        PhotoSelection::User => from(PhotoSource::User).collect(),
        PhotoSelection::Google => from(PhotoSource::Google).collect(),
        PhotoSelection::Both => from(PhotoSource::User)
            .chain(from(PhotoSource::Google))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use clinicdir_core::{PhotoType, WorkingHours};

    use super::*;

    fn photo(id: &str, source: PhotoSource) -> Photo {
        Photo {
            id: id.to_string(),
            photo_url: format!("https://cdn.test/{id}.jpg"),
            source,
            ..Photo::default()
        }
    }

    fn procedure(name: &str, category: &str) -> Procedure {
        Procedure {
            id: name.to_lowercase(),
            procedure_name: name.to_string(),
            category: category.to_string(),
            ..Procedure::default()
        }
    }

    #[test]
    fn rating_follows_source() {
        let draft = Draft {
            google_rating: 4.6,
            google_review_count: 88,
            ..Draft::default()
        };
        let google = to_preview_clinic_info(&draft, &RatingOptions::default());
        assert!((google.rating - 4.6).abs() < f64::EPSILON);
        assert_eq!(google.review_count, 88);

        let manual = to_preview_clinic_info(
            &draft,
            &RatingOptions {
                rating_source: RatingSource::Manual,
                manual_rating: Some(5.0),
                manual_review_count: None,
            },
        );
        assert!((manual.rating - 5.0).abs() < f64::EPSILON);
        assert_eq!(manual.review_count, 0);
    }

    #[test]
    fn logo_prefers_brand_photo_over_icon_url() {
        let mut logo = photo("logo", PhotoSource::User);
        logo.photo_type = Some(PhotoType::Logo);
        let mut draft = Draft {
            icon_url: "https://cdn.test/icon.png".to_string(),
            photos: vec![photo("gallery", PhotoSource::User), logo],
            ..Draft::default()
        };
        let info = to_preview_clinic_info(&draft, &RatingOptions::default());
        assert_eq!(info.logo_url.as_deref(), Some("https://cdn.test/logo.jpg"));

        draft.photos.truncate(1);
        let info = to_preview_clinic_info(&draft, &RatingOptions::default());
        assert_eq!(info.logo_url.as_deref(), Some("https://cdn.test/icon.png"));

        draft.icon_url = "  ".to_string();
        assert_eq!(
            to_preview_clinic_info(&draft, &RatingOptions::default()).logo_url,
            None
        );
    }

    #[test]
    fn hours_are_listed_monday_first() {
        let hours: WorkingHours = [
            ("Sunday", "Closed"),
            ("Holidays", "By appointment"),
            ("Monday", "9-5"),
            ("wednesday", "10-6"),
        ]
        .into_iter()
        .map(|(d, h)| (d.to_string(), h.to_string()))
        .collect();
        let draft = Draft {
            working_hours: Some(hours),
            ..Draft::default()
        };
        let days: Vec<String> = to_preview_clinic_info(&draft, &RatingOptions::default())
            .working_hours
            .into_iter()
            .map(|d| d.day)
            .collect();
        assert_eq!(days, vec!["Monday", "wednesday", "Sunday", "Holidays"]);
    }

    #[test]
    fn unnamed_providers_are_hidden() {
        let providers = vec![
            Provider {
                id: "1".to_string(),
                provider_name: " Dr. Roe ".to_string(),
                photo_url: Some(String::new()),
            },
            Provider::default(),
        ];
        let preview = to_preview_providers(&providers);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].name, "Dr. Roe");
        assert_eq!(preview[0].photo_url, None);
    }

    #[test]
    fn procedures_group_in_first_appearance_order() {
        let procedures = vec![
            procedure("Botox", "Injectables"),
            procedure("Peel", ""),
            procedure("Filler", "Injectables"),
            procedure("", "Lasers"),
        ];
        let groups = to_preview_procedures(&procedures);
        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Injectables", "Other"]);
        assert_eq!(groups[0].procedures.len(), 2);
        assert_eq!(groups[0].procedures[1].name, "Filler");
    }

    #[test]
    fn display_price_uses_range_or_average() {
        let mut p = procedure("Botox", "Injectables");
        assert_eq!(display_price(&p), None);

        p.average_price = Some(150.0);
        assert_eq!(display_price(&p).as_deref(), Some("$150"));

        p.price_min = Some(100.0);
        p.price_max = Some(1200.0);
        p.price_unit = Some("per session".to_string());
        assert_eq!(
            display_price(&p).as_deref(),
            Some("$100 - $1,200 per session")
        );
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(999.0), "$999");
        assert_eq!(format_money(1_234_567.0), "$1,234,567");
        assert_eq!(format_money(99.5), "$99.50");
    }

    #[test]
    fn photos_filter_by_source() {
        let mut upload = Photo {
            id: "upload".to_string(),
            photo_data: Some("data:image/png;base64,AAAA".to_string()),
            ..Photo::default()
        };
        upload.source = PhotoSource::User;
        let photos = vec![
            photo("g1", PhotoSource::Google),
            photo("u1", PhotoSource::User),
            Photo::default(),
            upload,
            photo("g2", PhotoSource::Google),
        ];

        let ids = |selection| -> Vec<String> {
            to_preview_photos(&photos, selection)
                .into_iter()
                .map(|p| p.id)
                .collect()
        };
        assert_eq!(ids(PhotoSelection::User), vec!["u1", "upload"]);
        assert_eq!(ids(PhotoSelection::Google), vec!["g1", "g2"]);
        assert_eq!(ids(PhotoSelection::Both), vec!["u1", "upload", "g1", "g2"]);
    }

    #[test]
    fn build_preview_combines_projections() {
        let draft = Draft {
            clinic_name: "Acme Clinic".to_string(),
            procedures: vec![procedure("Botox", "Injectables")],
            photos: vec![photo("g1", PhotoSource::Google)],
            ..Draft::default()
        };
        let preview = build_preview(&draft, &RatingOptions::default(), PhotoSelection::User);
        assert_eq!(preview.clinic.clinic_name, "Acme Clinic");
        assert_eq!(preview.procedures.len(), 1);
        assert!(preview.photos.is_empty());
    }
}
