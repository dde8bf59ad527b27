//! services/client/src/flows/admin.rs
//!
//! Plain-admin surfaces: the simplified single-decision review path and
//! organization management. Destructive actions go through the
//! confirmation port first.

use tracing::{info, warn};

use petro_repo_core::domain::{
    Document, DocumentStatus, NewOrganization, Organization, User, VoteDecision,
};
use petro_repo_core::ports::PortResult;
use petro_repo_core::review::{VoteTally, DIRECT_REVIEW};

use crate::flows::state::AppState;

//=========================================================================================
// Simplified Review Path
//=========================================================================================

/// The status a direct decision finalizes to, per the direct review track.
fn finalized_status(decision: VoteDecision) -> DocumentStatus {
    DIRECT_REVIEW.status_for(VoteTally::default().with_vote(decision))
}

pub async fn pending_queue(state: &AppState) -> PortResult<Vec<Document>> {
    state.api.pending_documents().await
}

/// Finalizes a pending document with a single admin decision. Rejection is
/// destructive and asks for confirmation first; a declined prompt returns
/// `None` without touching the API.
pub async fn decide(
    state: &AppState,
    document_id: i64,
    decision: VoteDecision,
) -> PortResult<Option<Document>> {
    if decision == VoteDecision::Reject {
        let question =
            format!("Reject document #{document_id}? This finalizes it as rejected.");
        if !state.confirm.confirm(&question).await {
            info!(document_id, "Rejection cancelled at the prompt");
            return Ok(None);
        }
    }

    let document = state.api.admin_review(document_id, decision).await?;

    // The server is authoritative; a mismatch with the mirrored transition
    // rule is worth surfacing in the logs.
    if document.status != finalized_status(decision) {
        warn!(
            document_id,
            status = ?document.status,
            "Server finalized to an unexpected status"
        );
    }

    Ok(Some(document))
}

/// Forwards an explicit admin delete, confirmation-gated.
pub async fn delete_document(state: &AppState, document_id: i64) -> PortResult<bool> {
    let question = format!("Delete document #{document_id}? This cannot be undone.");
    if !state.confirm.confirm(&question).await {
        return Ok(false);
    }
    state.api.delete_document(document_id).await?;
    info!(document_id, "Document deleted");
    Ok(true)
}

//=========================================================================================
// Organization Management
//=========================================================================================

pub async fn organizations(state: &AppState) -> PortResult<Vec<Organization>> {
    state.api.list_organizations().await
}

pub async fn organization(state: &AppState, organization_id: i64) -> PortResult<Organization> {
    state.api.get_organization(organization_id).await
}

pub async fn organization_members(
    state: &AppState,
    organization_id: i64,
) -> PortResult<Vec<User>> {
    state.api.organization_users(organization_id).await
}

/// Creates an organization. Duplicate-name conflicts come back as the
/// server's message verbatim.
pub async fn create_organization(
    state: &AppState,
    organization: &NewOrganization,
) -> PortResult<Organization> {
    state.api.create_organization(organization).await
}

/// Toggles an organization's active flag. Deactivation is destructive and
/// asks for confirmation; a declined prompt returns `None`.
pub async fn set_organization_active(
    state: &AppState,
    organization_id: i64,
    is_active: bool,
) -> PortResult<Option<Organization>> {
    if !is_active {
        let question = format!("Deactivate organization #{organization_id}?");
        if !state.confirm.confirm(&question).await {
            return Ok(None);
        }
    }
    let organization = state
        .api
        .set_organization_active(organization_id, is_active)
        .await?;
    Ok(Some(organization))
}
