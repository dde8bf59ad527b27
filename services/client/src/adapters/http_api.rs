//! services/client/src/adapters/http_api.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `RepositoryApi` port from the `core` crate. It owns transport details
//! only: URL construction, bearer attachment, status-to-error mapping, and
//! JSON decoding into domain types.
//!
//! Every request leaves through the same dispatch path. That path is also
//! where an authentication rejection (HTTP 401) tears the session down and
//! redirects to the entry page - implemented once here, not at call sites.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use petro_repo_core::domain::{
    AuthPayload, Credentials, Document, DocumentQuery, DocumentView, NewOrganization,
    Organization, Registration, User, VoteDecision, VoteOutcome,
};
use petro_repo_core::navigation::NavTarget;
use petro_repo_core::ports::{Navigator, PortError, PortResult, RepositoryApi};
use petro_repo_core::submission::{DocumentDraft, FilePayload};

use crate::session::SessionHandle;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `RepositoryApi` port against the
/// remote repository REST API.
pub struct HttpRepositoryApi {
    client: Client,
    base_url: String,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl HttpRepositoryApi {
    /// Builds the adapter with an explicit request timeout.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The single dispatch path for every request.
    ///
    /// The bearer token is read in one lock acquisition and attached when
    /// present. A 401 response tears down the session and redirects to the
    /// entry page before the error reaches any flow.
    async fn dispatch(&self, request: RequestBuilder) -> PortResult<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("API rejected authentication; tearing down session");
            self.session.teardown();
            self.navigator.navigate(NavTarget::Login);
            return Err(PortError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        let response = self.dispatch(self.client.get(self.url(path))).await?;
        decode(response).await
    }
}

//=========================================================================================
// RepositoryApi Implementation
//=========================================================================================

#[async_trait]
impl RepositoryApi for HttpRepositoryApi {
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthPayload> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        decode(self.dispatch(request).await?).await
    }

    async fn register(&self, registration: &Registration) -> PortResult<AuthPayload> {
        let request = self
            .client
            .post(self.url("/auth/register"))
            .json(registration);
        decode(self.dispatch(request).await?).await
    }

    async fn logout(&self) -> PortResult<()> {
        self.dispatch(self.client.post(self.url("/auth/logout")))
            .await?;
        Ok(())
    }

    async fn list_documents(&self, query: &DocumentQuery) -> PortResult<Vec<Document>> {
        let request = self
            .client
            .get(self.url("/documents"))
            .query(&query_pairs(query));
        decode(self.dispatch(request).await?).await
    }

    async fn get_document(&self, document_id: i64) -> PortResult<DocumentView> {
        self.get_json(&format!("/documents/{document_id}")).await
    }

    async fn submit_document(
        &self,
        draft: &DocumentDraft,
        file: &FilePayload,
    ) -> PortResult<Document> {
        let part =
            multipart::Part::bytes(file.content.to_vec()).file_name(file.file_name.clone());
        let mut form = multipart::Form::new()
            .text("title", draft.title.clone())
            .text("category", draft.category.clone())
            .part("file", part);
        if let Some(description) = &draft.description {
            form = form.text("description", description.clone());
        }

        let request = self.client.post(self.url("/documents")).multipart(form);
        decode(self.dispatch(request).await?).await
    }

    async fn download_document(&self, document_id: i64) -> PortResult<Bytes> {
        let response = self
            .dispatch(
                self.client
                    .get(self.url(&format!("/documents/{document_id}/download"))),
            )
            .await?;
        response.bytes().await.map_err(map_transport_error)
    }

    async fn preview_document(&self, document_id: i64) -> PortResult<String> {
        let response = self
            .dispatch(
                self.client
                    .get(self.url(&format!("/documents/{document_id}/preview"))),
            )
            .await?;
        response.text().await.map_err(map_transport_error)
    }

    async fn delete_document(&self, document_id: i64) -> PortResult<()> {
        self.dispatch(
            self.client
                .delete(self.url(&format!("/documents/{document_id}"))),
        )
        .await?;
        Ok(())
    }

    async fn cast_vote(
        &self,
        document_id: i64,
        decision: VoteDecision,
    ) -> PortResult<VoteOutcome> {
        let request = self.client.post(self.url(&format!(
            "/documents/{document_id}/{}",
            vote_action(decision)
        )));
        decode(self.dispatch(request).await?).await
    }

    async fn pending_documents(&self) -> PortResult<Vec<Document>> {
        self.get_json("/admin/documents/pending").await
    }

    async fn admin_review(
        &self,
        document_id: i64,
        decision: VoteDecision,
    ) -> PortResult<Document> {
        let request = self.client.patch(self.url(&format!(
            "/admin/documents/{document_id}/{}",
            vote_action(decision)
        )));
        decode(self.dispatch(request).await?).await
    }

    async fn list_organizations(&self) -> PortResult<Vec<Organization>> {
        self.get_json("/organizations").await
    }

    async fn get_organization(&self, organization_id: i64) -> PortResult<Organization> {
        self.get_json(&format!("/organizations/{organization_id}"))
            .await
    }

    async fn organization_users(&self, organization_id: i64) -> PortResult<Vec<User>> {
        self.get_json(&format!("/organizations/{organization_id}/users"))
            .await
    }

    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> PortResult<Organization> {
        let request = self
            .client
            .post(self.url("/organizations"))
            .json(organization);
        decode(self.dispatch(request).await?).await
    }

    async fn set_organization_active(
        &self,
        organization_id: i64,
        is_active: bool,
    ) -> PortResult<Organization> {
        let request = self
            .client
            .patch(self.url(&format!("/organizations/{organization_id}")))
            .json(&serde_json::json!({ "is_active": is_active }));
        decode(self.dispatch(request).await?).await
    }
}

//=========================================================================================
// Mapping Helpers
//=========================================================================================

fn vote_action(decision: VoteDecision) -> &'static str {
    match decision {
        VoteDecision::Approve => "approve",
        VoteDecision::Reject => "reject",
    }
}

fn query_pairs(query: &DocumentQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(search) = &query.search {
        pairs.push(("search", search.clone()));
    }
    if let Some(category) = &query.category {
        pairs.push(("category", category.clone()));
    }
    if let Some(file_type) = &query.file_type {
        pairs.push(("type", file_type.clone()));
    }
    if let Some(year) = query.year {
        pairs.push(("year", year.to_string()));
    }
    pairs
}

async fn decode<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|error| PortError::Transport(format!("undecodable response body: {error}")))
}

/// Pulls the server's human-readable message out of an error body. Error
/// payloads carry `{"message": ...}` (or `{"error": ...}`); plain-text
/// bodies are passed through as-is.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.get("message").or_else(|| value.get("error")))
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

fn map_status_error(status: StatusCode, body: &str) -> PortError {
    let message = server_message(body);
    match status {
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::FORBIDDEN => PortError::Forbidden(message),
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        StatusCode::CONFLICT => PortError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::Rejected(message)
        }
        _ => PortError::Transport(format!("status {}: {message}", status.as_u16())),
    }
}

fn map_transport_error(error: reqwest::Error) -> PortError {
    PortError::Transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user, FakeNavigator, FakeStorage};
    use petro_repo_core::domain::{PersistedSession, Role};
    use petro_repo_core::ports::SessionStorage;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[rstest]
    #[case::forbidden(StatusCode::FORBIDDEN, "Forbidden")]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::conflict(StatusCode::CONFLICT, "Conflict")]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, "Rejected")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_the_port_error_taxonomy(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, "{\"message\":\"You have already voted\"}");
        let actual = match error {
            PortError::Forbidden(_) => "Forbidden",
            PortError::NotFound(_) => "NotFound",
            PortError::Conflict(_) => "Conflict",
            PortError::Rejected(_) => "Rejected",
            PortError::Transport(_) => "Transport",
            PortError::Unauthorized => "Unauthorized",
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn conflict_errors_carry_the_server_message_verbatim() {
        let error = map_status_error(
            StatusCode::CONFLICT,
            "{\"message\":\"You have already voted on this document\"}",
        );
        assert_eq!(
            error.to_string(),
            "You have already voted on this document"
        );
    }

    #[test]
    fn plain_text_error_bodies_pass_through() {
        let message = server_message("organization name already taken");
        assert_eq!(message, "organization name already taken");
    }

    #[test]
    fn query_pairs_include_only_the_set_filters() {
        let query = DocumentQuery {
            search: Some("drilling".to_string()),
            category: None,
            file_type: Some("pdf".to_string()),
            year: Some(2023),
        };
        assert_eq!(
            query_pairs(&query),
            vec![
                ("search", "drilling".to_string()),
                ("type", "pdf".to_string()),
                ("year", "2023".to_string()),
            ]
        );
        assert!(query_pairs(&DocumentQuery::default()).is_empty());
    }

    #[test]
    fn vote_actions_map_to_their_endpoint_segments() {
        assert_eq!(vote_action(VoteDecision::Approve), "approve");
        assert_eq!(vote_action(VoteDecision::Reject), "reject");
    }

    /// Serves a single canned HTTP response on a local socket.
    async fn one_shot_server(status_line: &str, body: &str) -> std::net::SocketAddr {
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn a_401_from_any_endpoint_tears_down_the_session_once_at_the_transport_layer() {
        let addr = one_shot_server("401 Unauthorized", "").await;

        let storage = Arc::new(FakeStorage::default());
        storage
            .save(&PersistedSession {
                token: "stale-token".to_string(),
                user: sample_user(Role::Academic),
            })
            .unwrap();
        let session = SessionHandle::rehydrate(storage.clone());
        let navigator = Arc::new(FakeNavigator::default());

        let api = HttpRepositoryApi::new(
            format!("http://{addr}"),
            Duration::from_secs(5),
            session.clone(),
            navigator.clone(),
        )
        .unwrap();

        let error = api.pending_documents().await.unwrap_err();
        assert!(matches!(error, PortError::Unauthorized));

        // Both layers are cleared and the UI is sent to the entry page.
        assert!(!session.is_authenticated());
        assert!(storage.load().unwrap().is_none());
        assert_eq!(navigator.visited(), vec![NavTarget::Login]);
    }

    #[tokio::test]
    async fn successful_responses_decode_into_domain_types() {
        let addr = one_shot_server(
            "200 OK",
            "{\"status\":\"approved\",\"approve_votes_count\":7,\"reject_votes_count\":1,\"current_user_vote\":\"approve\"}",
        )
        .await;

        let session = SessionHandle::rehydrate(Arc::new(FakeStorage::default()));
        let navigator = Arc::new(FakeNavigator::default());
        let api = HttpRepositoryApi::new(
            format!("http://{addr}"),
            Duration::from_secs(5),
            session,
            navigator,
        )
        .unwrap();

        let outcome = api.cast_vote(12, VoteDecision::Approve).await.unwrap();
        assert_eq!(outcome.approve_votes_count, 7);
        assert_eq!(outcome.current_user_vote, Some(VoteDecision::Approve));
    }
}
