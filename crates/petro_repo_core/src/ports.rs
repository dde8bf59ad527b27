//! crates/petro_repo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the HTTP transport
//! or the on-disk session store.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    AuthPayload, Credentials, Document, DocumentQuery, DocumentView, NewOrganization,
    Organization, PersistedSession, Registration, User, VoteDecision, VoteOutcome,
};
use crate::navigation::NavTarget;
use crate::submission::{DocumentDraft, FilePayload};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the
/// HTTP transport or durable storage) into the categories the flows act on.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The server rejected the caller's authentication (HTTP 401). The
    /// transport layer reacts by tearing down the session before this
    /// surfaces to any flow.
    #[error("Unauthorized")]
    Unauthorized,
    /// The caller's role is insufficient (HTTP 403). Authoritative even when
    /// the client-side predicates disagreed.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Conflicting state on the server, e.g. a second vote or a duplicate
    /// organization name. Carries the server's message verbatim.
    #[error("{0}")]
    Conflict(String),
    /// The server rejected the submitted data. Carries the server's message
    /// verbatim so the UI can show the precise reason.
    #[error("{0}")]
    Rejected(String),
    /// Network-level failure: connection refused, timeout, undecodable body.
    #[error("Request failed: {0}")]
    Transport(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote repository REST API. The one implementation that talks HTTP
/// lives in the client service crate; tests substitute fakes.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    // --- Authentication ---
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthPayload>;

    async fn register(&self, registration: &Registration) -> PortResult<AuthPayload>;

    async fn logout(&self) -> PortResult<()>;

    // --- Documents ---
    async fn list_documents(&self, query: &DocumentQuery) -> PortResult<Vec<Document>>;

    async fn get_document(&self, document_id: i64) -> PortResult<DocumentView>;

    async fn submit_document(
        &self,
        draft: &DocumentDraft,
        file: &FilePayload,
    ) -> PortResult<Document>;

    async fn download_document(&self, document_id: i64) -> PortResult<Bytes>;

    async fn preview_document(&self, document_id: i64) -> PortResult<String>;

    async fn delete_document(&self, document_id: i64) -> PortResult<()>;

    // --- Panel review ---
    async fn cast_vote(
        &self,
        document_id: i64,
        decision: VoteDecision,
    ) -> PortResult<VoteOutcome>;

    // --- Plain-admin review ---
    async fn pending_documents(&self) -> PortResult<Vec<Document>>;

    async fn admin_review(
        &self,
        document_id: i64,
        decision: VoteDecision,
    ) -> PortResult<Document>;

    // --- Organizations ---
    async fn list_organizations(&self) -> PortResult<Vec<Organization>>;

    async fn get_organization(&self, organization_id: i64) -> PortResult<Organization>;

    async fn organization_users(&self, organization_id: i64) -> PortResult<Vec<User>>;

    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> PortResult<Organization>;

    async fn set_organization_active(
        &self,
        organization_id: i64,
        is_active: bool,
    ) -> PortResult<Organization>;
}

/// Durable storage for the persisted session. Both values live behind one
/// record so they cannot be written or cleared independently.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> PortResult<Option<PersistedSession>>;

    fn save(&self, session: &PersistedSession) -> PortResult<()>;

    fn clear(&self) -> PortResult<()>;
}

/// Screen redirection seam. Flows request navigation; they never perform it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: NavTarget);
}

/// Non-blocking notification channel. Replaces blocking browser dialogs for
/// success and failure feedback.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Boolean confirmation prompt, asked before destructive actions such as
/// rejecting a document or deactivating an organization.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}
