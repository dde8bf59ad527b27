//! crates/petro_repo_core/src/review.rs
//!
//! The document review state machine: pending documents accumulate votes
//! from distinct reviewers until one of two thresholds finalizes them.
//! The server owns the real transitions; this module mirrors the rule so
//! the client can display progress and reflect vote responses correctly.

use crate::domain::{DocumentStatus, VoteDecision};

//=========================================================================================
// Review Tracks
//=========================================================================================

/// Transition thresholds for one review track.
///
/// The reviewer panel and the plain-admin path are the same abstract
/// machine; they differ only in these two constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPolicy {
    /// Approvals at which a pending document becomes approved.
    pub approval_quorum: u32,
    /// Rejections at which a pending document becomes rejected.
    pub rejection_ceiling: u32,
}

/// Reviewer-panel track: seven approvals publish a document, three
/// rejections finalize it as rejected.
pub const PANEL_REVIEW: ReviewPolicy = ReviewPolicy {
    approval_quorum: 7,
    rejection_ceiling: 3,
};

/// Plain-admin track: a single decision finalizes immediately.
pub const DIRECT_REVIEW: ReviewPolicy = ReviewPolicy {
    approval_quorum: 1,
    rejection_ceiling: 1,
};

//=========================================================================================
// Tallies and Transitions
//=========================================================================================

/// A running count of votes on one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub approvals: u32,
    pub rejections: u32,
}

impl VoteTally {
    pub fn new(approvals: u32, rejections: u32) -> Self {
        Self {
            approvals,
            rejections,
        }
    }

    /// The tally after one more vote.
    pub fn with_vote(self, decision: VoteDecision) -> Self {
        match decision {
            VoteDecision::Approve => Self {
                approvals: self.approvals + 1,
                ..self
            },
            VoteDecision::Reject => Self {
                rejections: self.rejections + 1,
                ..self
            },
        }
    }
}

impl ReviewPolicy {
    /// The status a tally implies under this track's thresholds.
    ///
    /// Rejection is checked first so a tally that somehow crossed both
    /// thresholds resolves deterministically.
    pub fn status_for(&self, tally: VoteTally) -> DocumentStatus {
        if tally.rejections >= self.rejection_ceiling {
            DocumentStatus::Rejected
        } else if tally.approvals >= self.approval_quorum {
            DocumentStatus::Approved
        } else {
            DocumentStatus::Pending
        }
    }

    /// Percentage of the way to the approval quorum, clamped at 100, for
    /// progress-bar rendering.
    pub fn approval_progress(&self, approvals: u32) -> f64 {
        if self.approval_quorum == 0 {
            return 100.0;
        }
        (f64::from(approvals) / f64::from(self.approval_quorum)).min(1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn six_approvals_leave_a_document_pending_and_the_seventh_publishes() {
        let mut tally = VoteTally::default();
        for _ in 0..6 {
            tally = tally.with_vote(VoteDecision::Approve);
            assert_eq!(PANEL_REVIEW.status_for(tally), DocumentStatus::Pending);
        }
        tally = tally.with_vote(VoteDecision::Approve);
        assert_eq!(PANEL_REVIEW.status_for(tally), DocumentStatus::Approved);
    }

    #[test]
    fn the_third_rejection_finalizes_a_document_as_rejected() {
        let mut tally = VoteTally::new(4, 0);
        for _ in 0..2 {
            tally = tally.with_vote(VoteDecision::Reject);
            assert_eq!(PANEL_REVIEW.status_for(tally), DocumentStatus::Pending);
        }
        tally = tally.with_vote(VoteDecision::Reject);
        assert_eq!(PANEL_REVIEW.status_for(tally), DocumentStatus::Rejected);
    }

    #[rstest]
    #[case(VoteDecision::Approve, DocumentStatus::Approved)]
    #[case(VoteDecision::Reject, DocumentStatus::Rejected)]
    fn the_direct_track_finalizes_on_a_single_decision(
        #[case] decision: VoteDecision,
        #[case] expected: DocumentStatus,
    ) {
        let tally = VoteTally::default().with_vote(decision);
        assert_eq!(DIRECT_REVIEW.status_for(tally), expected);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(3, 3.0 / 7.0 * 100.0)]
    #[case(7, 100.0)]
    #[case(12, 100.0)]
    fn approval_progress_is_clamped_at_one_hundred(
        #[case] approvals: u32,
        #[case] expected: f64,
    ) {
        assert_eq!(PANEL_REVIEW.approval_progress(approvals), expected);
    }

    #[test]
    fn rejection_wins_when_both_thresholds_are_somehow_crossed() {
        let tally = VoteTally::new(9, 5);
        assert_eq!(PANEL_REVIEW.status_for(tally), DocumentStatus::Rejected);
    }
}
