//! services/client/src/flows/submission.rs
//!
//! The document submission flow: local pre-flight validation, then a single
//! multipart dispatch. Local failures, server rejections, and transport
//! failures stay distinguishable so the caller can show the precise reason.

use tracing::info;

use petro_repo_core::domain::Document;
use petro_repo_core::ports::PortError;
use petro_repo_core::submission::{
    DocumentDraft, FilePayload, SubmissionConstraints, SubmissionError,
};

use crate::flows::state::AppState;

/// Why a submission did not produce a document.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Failed locally; no request was dispatched.
    #[error(transparent)]
    Validation(#[from] SubmissionError),
    /// The request was dispatched and failed server-side or in transit.
    #[error(transparent)]
    Api(#[from] PortError),
}

/// One upload entry point. Both the general page and the strict legacy
/// modal are this flow with different constraints; so are drag-and-drop
/// and the file picker, which differ only in how the `FilePayload` was
/// produced.
pub struct SubmissionFlow {
    constraints: SubmissionConstraints,
}

impl SubmissionFlow {
    pub fn new(constraints: SubmissionConstraints) -> Self {
        Self { constraints }
    }

    pub fn general() -> Self {
        Self::new(SubmissionConstraints::general())
    }

    pub fn strict() -> Self {
        Self::new(SubmissionConstraints::strict())
    }

    pub fn constraints(&self) -> &SubmissionConstraints {
        &self.constraints
    }

    /// Validates locally, then submits. A successful submission does not
    /// mutate any cached document list; callers refetch.
    pub async fn submit(
        &self,
        state: &AppState,
        draft: &DocumentDraft,
        file: Option<&FilePayload>,
    ) -> Result<Document, SubmitError> {
        self.constraints.validate(draft, file)?;
        let Some(file) = file else {
            // validate() has already rejected this, but stay total.
            return Err(SubmissionError::MissingFile.into());
        };

        let document = state.api.submit_document(draft, file).await?;
        info!(document_id = document.id, "Document submitted");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, sample_document, FakeApi};
    use bytes::Bytes;
    use petro_repo_core::domain::DocumentStatus;
    use std::sync::atomic::Ordering;

    fn draft(title: &str) -> DocumentDraft {
        DocumentDraft {
            title: title.to_string(),
            category: "Exploration".to_string(),
            description: None,
        }
    }

    fn pdf_file() -> FilePayload {
        FilePayload::new("study.pdf", Bytes::from_static(b"%PDF-1.7"))
    }

    #[tokio::test]
    async fn validation_failures_never_reach_the_network() {
        let harness = harness(FakeApi::default());
        let flow = SubmissionFlow::general();

        let error = flow
            .submit(&harness.state, &draft(""), Some(&pdf_file()))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SubmitError::Validation(SubmissionError::MissingTitle)
        ));
        assert_eq!(harness.api.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_missing_file_never_reaches_the_network() {
        let harness = harness(FakeApi::default());
        let error = SubmissionFlow::general()
            .submit(&harness.state, &draft("A study"), None)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SubmitError::Validation(SubmissionError::MissingFile)
        ));
        assert_eq!(harness.api.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_valid_submission_dispatches_exactly_once() {
        let api = FakeApi::default();
        *api.submit_response.lock().unwrap() =
            Some(sample_document(DocumentStatus::Pending, 0, 0));
        let harness = harness(api);

        let document = SubmissionFlow::general()
            .submit(&harness.state, &draft("A study"), Some(&pdf_file()))
            .await
            .unwrap();

        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(harness.api.submit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_rejections_are_distinguishable_from_local_failures() {
        let harness = harness(FakeApi::default());

        let error = SubmissionFlow::general()
            .submit(&harness.state, &draft("A study"), Some(&pdf_file()))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SubmitError::Api(PortError::Rejected(ref message)) if message == "Invalid category"
        ));
    }
}
