//! services/client/src/flows/review.rs
//!
//! The reviewer-facing review screen for one document: vote casting behind
//! the single-vote guard, local state replaced only from the server's
//! response payload, and delayed navigation away once a terminal status
//! lands.

use std::time::Duration;

use tracing::info;

use petro_repo_core::domain::{DocumentStatus, DocumentView, VoteDecision, VoteOutcome};
use petro_repo_core::navigation::NavTarget;
use petro_repo_core::ports::{PortError, PortResult};
use petro_repo_core::review::{ReviewPolicy, PANEL_REVIEW};

use crate::flows::state::AppState;

/// How long the success message stays visible before the screen navigates
/// away from a finalized document.
pub const REVIEW_EXIT_DELAY: Duration = Duration::from_secs(3);

/// Why a vote did not commit.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// The reviewer already has a recorded vote; the controls are disabled
    /// and no request leaves the client.
    #[error("You have already voted on this document")]
    AlreadyVoted,
    /// The document is finalized; voting is closed.
    #[error("This document is no longer under review")]
    ReviewClosed,
    /// The request was dispatched and failed. Carries the server's message
    /// verbatim; local vote state is untouched.
    #[error(transparent)]
    Api(#[from] PortError),
}

pub struct ReviewScreen {
    view: DocumentView,
    policy: ReviewPolicy,
    exit_delay: Duration,
}

impl ReviewScreen {
    pub fn new(view: DocumentView) -> Self {
        Self {
            view,
            policy: PANEL_REVIEW,
            exit_delay: REVIEW_EXIT_DELAY,
        }
    }

    /// Overrides the exit delay; tests use zero.
    pub fn with_exit_delay(mut self, exit_delay: Duration) -> Self {
        self.exit_delay = exit_delay;
        self
    }

    /// Loads the screen for a document id.
    pub async fn open(state: &AppState, document_id: i64) -> PortResult<Self> {
        Ok(Self::new(state.api.get_document(document_id).await?))
    }

    pub fn view(&self) -> &DocumentView {
        &self.view
    }

    /// The vote controls are enabled only while the document is pending
    /// and the reviewer has not voted yet.
    pub fn can_vote(&self) -> bool {
        self.view.current_user_vote.is_none()
            && self.view.document.status == DocumentStatus::Pending
    }

    /// Progress toward the approval quorum, for the progress bar.
    pub fn approval_progress(&self) -> f64 {
        self.policy
            .approval_progress(self.view.document.approve_votes_count)
    }

    /// Casts the reviewer's single vote.
    ///
    /// With a vote already recorded this fails locally: no request leaves
    /// the client. On success the local counts are replaced from the
    /// response payload, and a terminal status schedules navigation away
    /// after the exit delay so the success message stays readable.
    pub async fn cast_vote(
        &mut self,
        state: &AppState,
        decision: VoteDecision,
    ) -> Result<VoteOutcome, VoteError> {
        if self.view.current_user_vote.is_some() {
            return Err(VoteError::AlreadyVoted);
        }
        if self.view.document.status.is_terminal() {
            return Err(VoteError::ReviewClosed);
        }

        let outcome = state.api.cast_vote(self.view.document.id, decision).await?;
        self.apply(&outcome);

        if let Some(message) = &outcome.message {
            state.notifier.success(message);
        }
        if outcome.status.is_terminal() {
            info!(
                document_id = self.view.document.id,
                "Document finalized; scheduling navigation away"
            );
            let navigator = state.navigator.clone();
            let delay = self.exit_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                navigator.navigate(NavTarget::AcademicDashboard);
            });
        }

        Ok(outcome)
    }

    /// Replaces local vote state from the response payload. Never derived
    /// from a stale cache, and never touched when a vote call fails.
    fn apply(&mut self, outcome: &VoteOutcome) {
        self.view.document.status = outcome.status;
        self.view.document.approve_votes_count = outcome.approve_votes_count;
        self.view.document.reject_votes_count = outcome.reject_votes_count;
        self.view.current_user_vote = outcome.current_user_vote;
    }
}
