//! Name/URL-keyed reconciliation of provider, procedure, and photo lists.

use std::collections::{HashMap, HashSet};

use clinicdir_core::draft::positive;
use clinicdir_core::{Photo, Procedure, Provider};

/// An item that can be matched between a draft list and an existing list.
pub trait Reconcile: Clone {
    /// Normalized match key, or `None` when the item has nothing to match on.
    fn match_key(&self) -> Option<String>;

    /// Combines a draft item with the existing item it matched.
    #[must_use]
    fn merge_from(&self, _existing: &Self) -> Self {
        self.clone()
    }
}

/// Result of [`reconcile_list`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    /// Draft items in draft order (merged where matched), then unmatched
    /// existing items.
    pub merged: Vec<T>,
    /// The existing items no draft item matched.
    pub missing_from_draft: Vec<T>,
}

/// Trimmed, lowercased name; `None` when blank.
#[must_use]
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Trimmed, lowercased URL without trailing slashes; `None` when blank.
#[must_use]
pub fn normalize_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Matches `draft_items` against `existing_items` by [`Reconcile::match_key`].
///
/// Each draft item appears exactly once, merged with the first existing item
/// sharing its key. Existing items whose key no draft item carries are
/// appended afterwards, once per key. Existing items without a key can
/// never be matched and are always appended.
pub fn reconcile_list<T: Reconcile>(draft_items: &[T], existing_items: &[T]) -> Reconciled<T> {
    let mut existing_by_key: HashMap<String, &T> = HashMap::new();
    for item in existing_items {
        if let Some(key) = item.match_key() {
            existing_by_key.entry(key).or_insert(item);
        }
    }

    let draft_keys: HashSet<String> = draft_items.iter().filter_map(Reconcile::match_key).collect();

    let mut merged: Vec<T> = draft_items
        .iter()
        .map(|item| {
            item.match_key()
                .and_then(|key| existing_by_key.get(&key))
                .map_or_else(|| item.clone(), |existing| item.merge_from(existing))
        })
        .collect();

    let mut appended = HashSet::new();
    let missing_from_draft: Vec<T> = existing_items
        .iter()
        .filter(|item| match item.match_key() {
            Some(key) => !draft_keys.contains(&key) && appended.insert(key),
            None => true,
        })
        .cloned()
        .collect();

    merged.extend(missing_from_draft.iter().cloned());
    Reconciled {
        merged,
        missing_from_draft,
    }
}

impl Reconcile for Provider {
    fn match_key(&self) -> Option<String> {
        normalize_name(&self.provider_name)
    }

    fn merge_from(&self, existing: &Self) -> Self {
        Provider {
            photo_url: self
                .photo_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .or_else(|| existing.photo_url.clone()),
            ..self.clone()
        }
    }
}

impl Reconcile for Procedure {
    fn match_key(&self) -> Option<String> {
        normalize_name(&self.procedure_name)
    }

    fn merge_from(&self, existing: &Self) -> Self {
        let average = positive(self.average_price).or(positive(existing.average_price));
        let price_min = positive(self.price_min)
            .or(positive(existing.price_min))
            .or(average);
        let price_max = positive(self.price_max)
            .or(positive(existing.price_max))
            .or(average);

        let provider_names = if self.provider_names.is_empty() {
            existing.provider_names.clone()
        } else {
            self.provider_names.clone()
        };

        Procedure {
            id: self.id.clone(),
            procedure_name: self.procedure_name.clone(),
            category: if self.category.trim().is_empty() {
                existing.category.clone()
            } else {
                self.category.clone()
            },
            price_min,
            price_max,
            price_unit: self
                .price_unit
                .clone()
                .or_else(|| existing.price_unit.clone()),
            average_price: average,
            provider_names,
        }
    }
}

impl Reconcile for Photo {
    fn match_key(&self) -> Option<String> {
        normalize_url(&self.photo_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str, name: &str) -> Provider {
        Provider {
            id: id.to_string(),
            provider_name: name.to_string(),
            photo_url: None,
        }
    }

    fn procedure(name: &str, min: Option<f64>, max: Option<f64>, avg: Option<f64>) -> Procedure {
        Procedure {
            id: format!("proc-{name}"),
            procedure_name: name.to_string(),
            category: "Injectables".to_string(),
            price_min: min,
            price_max: max,
            average_price: avg,
            ..Procedure::default()
        }
    }

    #[test]
    fn normalize_name_trims_and_lowercases() {
        assert_eq!(normalize_name("  Dr. Jane ROE "), Some("dr. jane roe".to_string()));
        assert_eq!(normalize_name("   "), None);
    }

    #[test]
    fn normalize_url_drops_trailing_slash() {
        assert_eq!(
            normalize_url(" https://CDN.test/a.jpg/ "),
            Some("https://cdn.test/a.jpg".to_string())
        );
        assert_eq!(normalize_url(""), None);
    }

    #[test]
    fn reconcile_preserves_draft_order_then_appends_existing() {
        let draft = vec![provider("d1", "Sam Lee"), provider("d2", "Dr. Roe")];
        let existing = vec![
            provider("e1", "Amy Chen"),
            provider("e2", "dr. roe"),
            provider("e3", "Bo Park"),
        ];
        let result = reconcile_list(&draft, &existing);
        let ids: Vec<&str> = result.merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "e1", "e3"]);
        let missing: Vec<&str> = result
            .missing_from_draft
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(missing, vec!["e1", "e3"]);
    }

    #[test]
    fn reconcile_appends_duplicate_existing_keys_once() {
        let existing = vec![provider("e1", "Amy Chen"), provider("e2", " AMY CHEN ")];
        let result = reconcile_list(&[], &existing);
        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.merged[0].id, "e1");
    }

    #[test]
    fn reconcile_keeps_unnamed_items() {
        let draft = vec![provider("d1", "")];
        let existing = vec![provider("e1", "")];
        let result = reconcile_list(&draft, &existing);
        let ids: Vec<&str> = result.merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "e1"]);
    }

    #[test]
    fn provider_merge_fills_missing_photo() {
        let draft = vec![provider("d1", "Dr. Roe")];
        let mut existing = provider("e1", "Dr. Roe");
        existing.photo_url = Some("https://cdn.test/roe.jpg".to_string());
        let result = reconcile_list(&draft, &[existing]);
        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.merged[0].id, "d1");
        assert_eq!(
            result.merged[0].photo_url.as_deref(),
            Some("https://cdn.test/roe.jpg")
        );
    }

    #[test]
    fn procedure_merge_derives_prices_from_average() {
        let draft = vec![procedure("Botox", Some(0.0), Some(0.0), Some(150.0))];
        let existing = vec![procedure("botox", None, None, None)];
        let merged = &reconcile_list(&draft, &existing).merged[0];
        assert_eq!(merged.price_min, Some(150.0));
        assert_eq!(merged.price_max, Some(150.0));
    }

    #[test]
    fn procedure_merge_prefers_draft_then_existing_bounds() {
        let draft = vec![procedure("Botox", Some(250.0), None, None)];
        let existing = vec![procedure("Botox", Some(100.0), Some(400.0), Some(300.0))];
        let merged = &reconcile_list(&draft, &existing).merged[0];
        assert_eq!(merged.price_min, Some(250.0));
        assert_eq!(merged.price_max, Some(400.0));
        assert_eq!(merged.average_price, Some(300.0));
    }

    #[test]
    fn procedure_merge_uses_existing_average_when_draft_has_none() {
        let draft = vec![procedure("Botox", None, None, Some(0.0))];
        let existing = vec![procedure("Botox", Some(0.0), None, Some(275.0))];
        let merged = &reconcile_list(&draft, &existing).merged[0];
        assert_eq!(merged.price_min, Some(275.0));
        assert_eq!(merged.price_max, Some(275.0));
    }

    #[test]
    fn procedure_merge_provider_names_fallback() {
        let mut with_names = procedure("Botox", None, None, None);
        with_names.provider_names = vec!["Dr. Roe".to_string()];
        let without_names = procedure("Botox", None, None, None);

        let merged = &reconcile_list(&[without_names.clone()], &[with_names.clone()]).merged[0];
        assert_eq!(merged.provider_names, vec!["Dr. Roe".to_string()]);

        let mut replaced = without_names;
        replaced.provider_names = vec!["Sam Lee".to_string()];
        let merged = &reconcile_list(&[replaced], &[with_names]).merged[0];
        assert_eq!(merged.provider_names, vec!["Sam Lee".to_string()]);
    }

    #[test]
    fn photos_match_by_normalized_url() {
        let photo = |id: &str, url: &str| Photo {
            id: id.to_string(),
            photo_url: url.to_string(),
            ..Photo::default()
        };
        let draft = vec![photo("d1", "https://cdn.test/a.jpg/")];
        let existing = vec![photo("e1", "HTTPS://cdn.test/a.jpg"), photo("e2", "https://cdn.test/b.jpg")];
        let result = reconcile_list(&draft, &existing);
        let ids: Vec<&str> = result.merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "e2"]);
    }
}
