//! services/client/src/flows/auth.rs
//!
//! Login, registration, and logout flows, plus the mount-time screen gate.

use petro_repo_core::domain::{Credentials, Registration, Session};
use petro_repo_core::navigation::{self, NavTarget};
use petro_repo_core::ports::PortResult;
use tracing::{info, warn};

use crate::flows::state::AppState;

/// Exchanges credentials for a session. On failure the prior session is
/// left untouched and the error message is suitable for direct display.
pub async fn login(state: &AppState, credentials: &Credentials) -> PortResult<Session> {
    let payload = state.api.login(credentials).await?;
    state.session.install(payload.user, payload.token)?;
    info!("Logged in as {}", credentials.email);
    Ok(state.session.snapshot())
}

/// Identical contract to login; the requested role is restricted to the
/// self-service set by construction of `RegistrationRole`.
pub async fn register(state: &AppState, registration: &Registration) -> PortResult<Session> {
    let payload = state.api.register(registration).await?;
    state.session.install(payload.user, payload.token)?;
    info!("Registered {}", registration.email);
    Ok(state.session.snapshot())
}

/// Best-effort server notification, then unconditional teardown. An API
/// failure is logged and swallowed; it never blocks logout.
pub async fn logout(state: &AppState) {
    if let Err(error) = state.api.logout().await {
        warn!("Logout notification failed: {error}");
    }
    state.session.teardown();
}

/// Mount-time gate for protected screens. A denied identity is redirected
/// home; the server still authorizes every call behind the screen.
pub fn guard_screen(state: &AppState, screen: NavTarget) -> bool {
    let session = state.session.snapshot();
    if navigation::may_render(&session, screen) {
        true
    } else {
        warn!("Blocked {screen:?} for the current identity");
        state.navigator.navigate(navigation::DENIED_REDIRECT);
        false
    }
}
