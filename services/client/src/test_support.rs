//! services/client/src/test_support.rs
//!
//! Hand-written fakes for the core ports plus sample records, shared by the
//! unit tests across this crate. Unconfigured fake endpoints panic so a test
//! immediately exposes an unexpected request.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use petro_repo_core::domain::{
    AuthPayload, Credentials, Document, DocumentQuery, DocumentStatus, DocumentView,
    NewOrganization, Organization, PersistedSession, Registration, Role, User, VoteDecision,
    VoteOutcome,
};
use petro_repo_core::navigation::NavTarget;
use petro_repo_core::ports::{
    ConfirmationPrompt, Navigator, Notifier, PortError, PortResult, RepositoryApi,
    SessionStorage,
};
use petro_repo_core::submission::{DocumentDraft, FilePayload};

use crate::config::Config;
use crate::flows::state::AppState;
use crate::session::SessionHandle;

//=========================================================================================
// Sample Records
//=========================================================================================

pub fn sample_user(role: Role) -> User {
    User {
        id: 42,
        name: "Amina Yusuf".to_string(),
        email: "amina@example.com".to_string(),
        role,
        organization_id: Some(3),
        specialization: Some("Reservoir Engineering".to_string()),
    }
}

pub fn sample_document(status: DocumentStatus, approvals: u32, rejections: u32) -> Document {
    Document {
        id: 12,
        title: "Seismic Survey Methods".to_string(),
        description: Some("Survey methodology notes".to_string()),
        category: "Exploration".to_string(),
        file_name: "survey.pdf".to_string(),
        file_type: "pdf".to_string(),
        file_size: 4096,
        status,
        uploader: "j.okoro".to_string(),
        approve_votes_count: approvals,
        reject_votes_count: rejections,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn pending_view(approvals: u32, rejections: u32) -> DocumentView {
    DocumentView {
        document: sample_document(DocumentStatus::Pending, approvals, rejections),
        current_user_vote: None,
    }
}

//=========================================================================================
// Port Fakes
//=========================================================================================

#[derive(Default)]
pub struct FakeStorage {
    slot: Mutex<Option<PersistedSession>>,
    failing: bool,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            slot: Mutex::new(None),
            failing: true,
        }
    }
}

impl SessionStorage for FakeStorage {
    fn load(&self) -> PortResult<Option<PersistedSession>> {
        if self.failing {
            return Err(PortError::Transport("store offline".to_string()));
        }
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, session: &PersistedSession) -> PortResult<()> {
        *self.slot.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    visited: Mutex<Vec<NavTarget>>,
}

impl FakeNavigator {
    pub fn visited(&self) -> Vec<NavTarget> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for FakeNavigator {
    fn navigate(&self, target: NavTarget) {
        self.visited.lock().unwrap().push(target);
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    messages: Mutex<Vec<String>>,
}

impl FakeNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for FakeNotifier {
    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct FakeConfirm {
    pub answer: bool,
    pub asked: AtomicUsize,
}

impl FakeConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ConfirmationPrompt for FakeConfirm {
    async fn confirm(&self, _question: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// A scriptable `RepositoryApi`: configure the responses a test needs and
/// count the requests that actually leave the client.
#[derive(Default)]
pub struct FakeApi {
    pub login_response: Mutex<Option<AuthPayload>>,
    pub logout_error: bool,
    pub logout_calls: AtomicUsize,
    pub document: Mutex<Option<DocumentView>>,
    pub vote_responses: Mutex<Vec<PortResult<VoteOutcome>>>,
    pub vote_calls: AtomicUsize,
    pub submit_response: Mutex<Option<Document>>,
    pub submit_calls: AtomicUsize,
    pub admin_response: Mutex<Option<Document>>,
    pub admin_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeApi {
    fn unexpected(&self, endpoint: &str) -> ! {
        panic!("unexpected call to {endpoint} in this test");
    }
}

#[async_trait]
impl RepositoryApi for FakeApi {
    async fn login(&self, _credentials: &Credentials) -> PortResult<AuthPayload> {
        match self.login_response.lock().unwrap().clone() {
            Some(payload) => Ok(payload),
            None => Err(PortError::Rejected("Invalid email or password".to_string())),
        }
    }

    async fn register(&self, _registration: &Registration) -> PortResult<AuthPayload> {
        self.unexpected("register")
    }

    async fn logout(&self) -> PortResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_error {
            Err(PortError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn list_documents(&self, _query: &DocumentQuery) -> PortResult<Vec<Document>> {
        self.unexpected("list_documents")
    }

    async fn get_document(&self, document_id: i64) -> PortResult<DocumentView> {
        match self.document.lock().unwrap().clone() {
            Some(view) => Ok(view),
            None => Err(PortError::NotFound(format!(
                "document {document_id} not found"
            ))),
        }
    }

    async fn submit_document(
        &self,
        _draft: &DocumentDraft,
        _file: &FilePayload,
    ) -> PortResult<Document> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match self.submit_response.lock().unwrap().clone() {
            Some(document) => Ok(document),
            None => Err(PortError::Rejected("Invalid category".to_string())),
        }
    }

    async fn download_document(&self, _document_id: i64) -> PortResult<Bytes> {
        self.unexpected("download_document")
    }

    async fn preview_document(&self, _document_id: i64) -> PortResult<String> {
        self.unexpected("preview_document")
    }

    async fn delete_document(&self, _document_id: i64) -> PortResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn cast_vote(
        &self,
        _document_id: i64,
        _decision: VoteDecision,
    ) -> PortResult<VoteOutcome> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.vote_responses.lock().unwrap();
        if responses.is_empty() {
            self.unexpected("cast_vote");
        }
        responses.remove(0)
    }

    async fn pending_documents(&self) -> PortResult<Vec<Document>> {
        self.unexpected("pending_documents")
    }

    async fn admin_review(
        &self,
        _document_id: i64,
        _decision: VoteDecision,
    ) -> PortResult<Document> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        match self.admin_response.lock().unwrap().clone() {
            Some(document) => Ok(document),
            None => self.unexpected("admin_review"),
        }
    }

    async fn list_organizations(&self) -> PortResult<Vec<Organization>> {
        self.unexpected("list_organizations")
    }

    async fn get_organization(&self, _organization_id: i64) -> PortResult<Organization> {
        self.unexpected("get_organization")
    }

    async fn organization_users(&self, _organization_id: i64) -> PortResult<Vec<User>> {
        self.unexpected("organization_users")
    }

    async fn create_organization(
        &self,
        _organization: &NewOrganization,
    ) -> PortResult<Organization> {
        self.unexpected("create_organization")
    }

    async fn set_organization_active(
        &self,
        _organization_id: i64,
        _is_active: bool,
    ) -> PortResult<Organization> {
        self.unexpected("set_organization_active")
    }
}

//=========================================================================================
// Harness
//=========================================================================================

pub struct TestHarness {
    pub state: AppState,
    pub api: Arc<FakeApi>,
    pub storage: Arc<FakeStorage>,
    pub navigator: Arc<FakeNavigator>,
    pub notifier: Arc<FakeNotifier>,
    pub confirm: Arc<FakeConfirm>,
}

pub fn harness(api: FakeApi) -> TestHarness {
    harness_confirming(api, true)
}

pub fn harness_confirming(api: FakeApi, confirm_answer: bool) -> TestHarness {
    let api = Arc::new(api);
    let storage = Arc::new(FakeStorage::default());
    let navigator = Arc::new(FakeNavigator::default());
    let notifier = Arc::new(FakeNotifier::default());
    let confirm = Arc::new(FakeConfirm::answering(confirm_answer));
    let session = SessionHandle::rehydrate(storage.clone());
    let state = AppState {
        api: api.clone(),
        session,
        navigator: navigator.clone(),
        notifier: notifier.clone(),
        confirm: confirm.clone(),
        config: Arc::new(test_config()),
    };
    TestHarness {
        state,
        api,
        storage,
        navigator,
        notifier,
        confirm,
    }
}

fn test_config() -> Config {
    Config {
        api_base_url: "http://localhost:0".to_string(),
        session_path: PathBuf::from("./unused-session.json"),
        log_level: tracing::Level::INFO,
        request_timeout: Duration::from_secs(5),
    }
}
