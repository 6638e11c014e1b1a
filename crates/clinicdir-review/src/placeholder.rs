//! Recognition of draft values that were never really provided.
//!
//! Adjustment drafts are often submitted with filler text in fields the
//! submitter did not intend to change. Those values must yield to the
//! published clinic's data during merge and must not show up as changes.

/// Filler strings, compared trimmed and case-insensitively.
pub const PLACEHOLDER_VALUES: [&str; 5] = [
    "see existing clinic",
    "existing clinic update",
    "placeholder",
    "test",
    "n/a",
];

/// Returns `true` when `value` is blank or one of [`PLACEHOLDER_VALUES`].
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || PLACEHOLDER_VALUES
            .iter()
            .any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// The draft's text unless it is a placeholder, otherwise the existing text.
#[must_use]
pub fn pick_text(draft: &str, existing: &str) -> String {
    if is_placeholder(draft) {
        existing.to_string()
    } else {
        draft.to_string()
    }
}
