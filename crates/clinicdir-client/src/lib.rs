pub mod client;
pub mod error;
pub mod types;
pub mod workflow;

pub use client::ClinicApiClient;
pub use error::ClientError;
pub use types::{ApproveRequest, DraftRecord, RejectRequest};
pub use workflow::{
    find_deleted_clinic, load_clinic_for_edit, load_draft_review, load_review_session,
    submit_clinic_edit, DraftReview,
};
