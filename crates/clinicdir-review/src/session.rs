//! The admin review session as a single immutable state value.
//!
//! Every transition returns a new [`ReviewSession`]. Loads are tagged with a
//! generation number so that a response to a superseded fetch is dropped
//! instead of overwriting the state of a newer one.

use clinicdir_core::{Draft, ExistingClinic};
use serde::Serialize;

use crate::diff::{compute_diff, DiffResult};
use crate::error::ReviewError;
use crate::merge::merge_with_existing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    Preview,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    Rejected,
    Restored,
    Deleted,
}

impl ReviewOutcome {
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Approved => "approve",
            Self::Rejected => "reject",
            Self::Restored => "restore",
            Self::Deleted => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewState {
    Loading,
    Error {
        message: String,
    },
    NotFound,
    Ready {
        draft: Draft,
        /// The published clinic an adjustment draft targets, if any.
        existing: Option<ExistingClinic>,
        mode: ReviewMode,
    },
    Finished {
        outcome: ReviewOutcome,
    },
}

impl ReviewState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error { .. } => "error",
            Self::NotFound => "not_found",
            Self::Ready {
                mode: ReviewMode::Preview,
                ..
            } => "previewing",
            Self::Ready {
                mode: ReviewMode::Edit,
                ..
            } => "editing",
            Self::Finished { .. } => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSession {
    generation: u64,
    state: ReviewState,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    /// A session waiting on its first load (generation `0`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: ReviewState::Loading,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// Starts a new fetch. Results tagged with older generations are ignored
    /// from here on.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidTransition`] once the session is finished.
    pub fn reload(&self) -> Result<Self, ReviewError> {
        if matches!(self.state, ReviewState::Finished { .. }) {
            return Err(self.invalid("reload"));
        }
        Ok(Self {
            generation: self.generation + 1,
            state: ReviewState::Loading,
        })
    }

    /// Applies a successful load for `generation`.
    #[must_use]
    pub fn loaded(
        &self,
        generation: u64,
        draft: Draft,
        existing: Option<ExistingClinic>,
    ) -> Self {
        self.settle(
            generation,
            ReviewState::Ready {
                draft,
                existing,
                mode: ReviewMode::Preview,
            },
        )
    }

    #[must_use]
    pub fn failed(&self, generation: u64, message: impl Into<String>) -> Self {
        self.settle(
            generation,
            ReviewState::Error {
                message: message.into(),
            },
        )
    }

    #[must_use]
    pub fn not_found(&self, generation: u64) -> Self {
        self.settle(generation, ReviewState::NotFound)
    }

    fn settle(&self, generation: u64, state: ReviewState) -> Self {
        if generation != self.generation || self.state != ReviewState::Loading {
            tracing::debug!(
                current = self.generation,
                stale = generation,
                state = self.state.name(),
                "dropping superseded review load"
            );
            return self.clone();
        }
        Self {
            generation,
            state,
        }
    }

    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidTransition`] unless the session is
    /// previewing a loaded draft.
    pub fn begin_edit(&self) -> Result<Self, ReviewError> {
        match &self.state {
            ReviewState::Ready {
                draft,
                existing,
                mode: ReviewMode::Preview,
            } => Ok(self.with_state(ReviewState::Ready {
                draft: draft.clone(),
                existing: existing.clone(),
                mode: ReviewMode::Edit,
            })),
            _ => Err(self.invalid("edit")),
        }
    }

    /// Leaves edit mode without keeping changes.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidTransition`] unless the session is editing.
    pub fn cancel_edit(&self) -> Result<Self, ReviewError> {
        match &self.state {
            ReviewState::Ready {
                draft,
                existing,
                mode: ReviewMode::Edit,
            } => Ok(self.with_state(ReviewState::Ready {
                draft: draft.clone(),
                existing: existing.clone(),
                mode: ReviewMode::Preview,
            })),
            _ => Err(self.invalid("cancel edit")),
        }
    }

    /// Replaces the draft wholesale with `edited` and returns to preview.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidTransition`] unless the session is editing.
    pub fn save_edit(&self, edited: Draft) -> Result<Self, ReviewError> {
        match &self.state {
            ReviewState::Ready {
                existing,
                mode: ReviewMode::Edit,
                ..
            } => Ok(self.with_state(ReviewState::Ready {
                draft: edited,
                existing: existing.clone(),
                mode: ReviewMode::Preview,
            })),
            _ => Err(self.invalid("save edit")),
        }
    }

    /// Records a terminal moderation decision.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidTransition`] unless the session is
    /// previewing a loaded draft. Unsaved edits must be saved or cancelled
    /// first.
    pub fn finish(&self, outcome: ReviewOutcome) -> Result<Self, ReviewError> {
        match &self.state {
            ReviewState::Ready {
                mode: ReviewMode::Preview,
                ..
            } => Ok(self.with_state(ReviewState::Finished { outcome })),
            _ => Err(self.invalid(outcome.action())),
        }
    }

    /// The draft as it would be published: merged with the existing clinic
    /// when there is one.
    #[must_use]
    pub fn merged_draft(&self) -> Option<Draft> {
        match &self.state {
            ReviewState::Ready {
                draft,
                existing: Some(existing),
                ..
            } => Some(merge_with_existing(draft, existing)),
            ReviewState::Ready { draft, .. } => Some(draft.clone()),
            _ => None,
        }
    }

    /// Changes the merged draft proposes against the existing clinic, if
    /// any. Fields the draft leaves to the clinic never show as changes.
    #[must_use]
    pub fn diff(&self) -> Option<DiffResult> {
        match &self.state {
            ReviewState::Ready {
                draft,
                existing: Some(existing),
                ..
            } => Some(compute_diff(&merge_with_existing(draft, existing), existing)),
            _ => None,
        }
    }

    fn with_state(&self, state: ReviewState) -> Self {
        Self {
            generation: self.generation,
            state,
        }
    }

    fn invalid(&self, action: &'static str) -> ReviewError {
        ReviewError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
