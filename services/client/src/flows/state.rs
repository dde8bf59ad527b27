//! services/client/src/flows/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use petro_repo_core::ports::{ConfirmationPrompt, Navigator, Notifier, RepositoryApi};

use crate::config::Config;
use crate::session::SessionHandle;

/// The shared application state, created once at startup and passed to all
/// flows. Every collaborator sits behind a port so tests can substitute
/// fakes.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn RepositoryApi>,
    pub session: SessionHandle,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn ConfirmationPrompt>,
    pub config: Arc<Config>,
}
