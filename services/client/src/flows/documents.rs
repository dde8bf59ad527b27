//! services/client/src/flows/documents.rs
//!
//! Read-side document flows: browsing, detail views, preview, download.

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::info;

use petro_repo_core::domain::{Document, DocumentQuery, DocumentView};
use petro_repo_core::ports::{PortError, PortResult};
use petro_repo_core::preview::{self, PreviewContent};

use crate::flows::state::AppState;

/// A detail screen's data. The not-found case is a state, not an error, so
/// the screen can render a way back instead of crashing.
#[derive(Debug)]
pub enum DocumentScreen {
    Found(Box<DocumentView>),
    NotFound,
}

pub async fn browse(state: &AppState, query: &DocumentQuery) -> PortResult<Vec<Document>> {
    state.api.list_documents(query).await
}

pub async fn open(state: &AppState, document_id: i64) -> PortResult<DocumentScreen> {
    match state.api.get_document(document_id).await {
        Ok(view) => Ok(DocumentScreen::Found(Box::new(view))),
        Err(PortError::NotFound(_)) => Ok(DocumentScreen::NotFound),
        Err(error) => Err(error),
    }
}

/// Fetches and builds the preview for a document.
///
/// The cancellation token lets a navigating caller abandon the in-flight
/// fetch; an abandoned preview renders the unavailable state. A missing
/// preview body renders the same state instead of an error.
pub async fn preview(
    state: &AppState,
    document: &Document,
    cancel: CancellationToken,
) -> PortResult<PreviewContent> {
    let body = tokio::select! {
        // Cancellation wins over a fetch that is also ready.
        biased;
        () = cancel.cancelled() => {
            info!(document_id = document.id, "Preview fetch abandoned");
            return Ok(PreviewContent::Unavailable);
        }
        body = state.api.preview_document(document.id) => match body {
            Ok(body) => Some(body),
            Err(PortError::NotFound(_)) => None,
            Err(error) => return Err(error),
        },
    };
    Ok(preview::build_preview(document, body.as_deref()))
}

pub async fn download(state: &AppState, document_id: i64) -> PortResult<Bytes> {
    state.api.download_document(document_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, pending_view, FakeApi};

    #[tokio::test]
    async fn a_missing_document_is_a_not_found_state_not_an_error() {
        let harness = harness(FakeApi::default());
        match open(&harness.state, 999).await.unwrap() {
            DocumentScreen::NotFound => {}
            other => panic!("expected the not-found state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn an_existing_document_opens_with_its_vote_state() {
        let api = FakeApi::default();
        *api.document.lock().unwrap() = Some(pending_view(2, 0));
        let harness = harness(api);

        match open(&harness.state, 12).await.unwrap() {
            DocumentScreen::Found(view) => {
                assert_eq!(view.document.approve_votes_count, 2);
                assert_eq!(view.current_user_vote, None);
            }
            DocumentScreen::NotFound => panic!("expected the document"),
        }
    }

    #[tokio::test]
    async fn a_cancelled_preview_renders_the_unavailable_state() {
        // The API fake would panic if the fetch actually went out after
        // cancellation, so this also proves the request is abandoned.
        let harness = harness(FakeApi::default());
        let document = pending_view(0, 0).document;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let content = preview(&harness.state, &document, cancel).await.unwrap();
        assert_eq!(content, PreviewContent::Unavailable);
    }
}
