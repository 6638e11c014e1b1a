//! Draft reconciliation engine for the clinic admin review workflow.
//!
//! Raw payloads enter through [`normalize`], adjustment drafts are merged
//! with their published clinic by [`merge_with_existing`], and the moderator
//! sees the change set from [`compute_diff`]. Everything here is synchronous
//! and pure over its inputs.

pub mod diff;
pub mod error;
mod fields;
pub mod merge;
pub mod normalize;
pub mod placeholder;
pub mod preview;
pub mod reconcile;
pub mod session;
pub mod submission;

pub use diff::{compute_diff, ChangeKind, DiffField, DiffResult, FieldChange, FieldValue};
pub use error::ReviewError;
pub use merge::merge_with_existing;
pub use normalize::{
    normalize, normalize_clinic, normalize_deleted_summary, normalize_photos, split_address,
    SourceKind,
};
pub use placeholder::{is_placeholder, PLACEHOLDER_VALUES};
pub use preview::{
    build_preview, to_preview_clinic_info, to_preview_photos, to_preview_procedures,
    to_preview_providers, PhotoSelection, Preview, RatingOptions, RatingSource,
};
pub use reconcile::{reconcile_list, Reconcile, Reconciled};
pub use session::{ReviewMode, ReviewOutcome, ReviewSession, ReviewState};
pub use submission::{build_submission, SubmissionPayload};
