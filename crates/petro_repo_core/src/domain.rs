//! crates/petro_repo_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These are client-side views of server-owned records; the client never
//! originates ids and replaces these values wholesale from API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Roles and Predicates
//=========================================================================================

/// The closed set of server-assigned roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Contributor,
    Academic,
    Admin,
    OrgAdmin,
    SuperAdmin,
}

impl Role {
    pub fn is_super_admin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn is_org_admin(self) -> bool {
        matches!(self, Role::OrgAdmin)
    }

    /// True for admin, org_admin and super_admin.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::OrgAdmin | Role::SuperAdmin)
    }

    pub fn is_academic(self) -> bool {
        matches!(self, Role::Academic)
    }

    /// Roles permitted to submit documents: contributor and everything
    /// above it in privilege, plus academic.
    pub fn can_contribute(self) -> bool {
        matches!(
            self,
            Role::Contributor | Role::Academic | Role::Admin | Role::OrgAdmin | Role::SuperAdmin
        )
    }
}

/// The restricted subset of roles a visitor may request at registration.
/// Elevated roles are not representable through this path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationRole {
    User,
    Contributor,
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// Represents a user - used throughout the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization_id: Option<i64>,
    pub specialization: Option<String>,
}

/// The in-memory session: current identity plus the bearer token.
///
/// Invariant: `token` is present iff `user` is present. Every predicate is
/// total and returns `false` for an anonymous session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role().map_or(false, Role::is_super_admin)
    }

    pub fn is_org_admin(&self) -> bool {
        self.role().map_or(false, Role::is_org_admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role().map_or(false, Role::is_admin)
    }

    pub fn is_academic(&self) -> bool {
        self.role().map_or(false, Role::is_academic)
    }

    pub fn can_contribute(&self) -> bool {
        self.role().map_or(false, Role::can_contribute)
    }
}

/// The durable form of an authenticated session: exactly the two values
/// the client persists across reloads, written and cleared together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

//=========================================================================================
// Authentication Payloads
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: RegistrationRole,
    pub organization_id: Option<i64>,
    pub specialization: Option<String>,
}

/// What a successful login or registration hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

//=========================================================================================
// Documents
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    /// Approved and rejected are terminal; no further votes apply.
    pub fn is_terminal(self) -> bool {
        !matches!(self, DocumentStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDecision {
    Approve,
    Reject,
}

/// A document record as the server lists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub status: DocumentStatus,
    pub uploader: String,
    pub approve_votes_count: u32,
    pub reject_votes_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A document detail as served to the current caller: the record plus the
/// caller's own recorded vote, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentView {
    pub document: Document,
    pub current_user_vote: Option<VoteDecision>,
}

/// The vote endpoints return the updated tally and status; the client
/// replaces its local view from this payload rather than re-deriving it
/// from a stale cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub status: DocumentStatus,
    pub approve_votes_count: u32,
    pub reject_votes_count: u32,
    pub current_user_vote: Option<VoteDecision>,
    pub message: Option<String>,
}

/// Search and filter parameters for the document list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub year: Option<u16>,
}

//=========================================================================================
// Organizations
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub contact_email: Option<String>,
    pub website: Option<String>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub short_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_with_role(role: Role) -> User {
        User {
            id: 7,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
            organization_id: None,
            specialization: None,
        }
    }

    #[rstest]
    #[case(Role::User, false, false, false)]
    #[case(Role::Contributor, false, true, false)]
    #[case(Role::Academic, false, true, true)]
    #[case(Role::Admin, true, true, false)]
    #[case(Role::OrgAdmin, true, true, false)]
    #[case(Role::SuperAdmin, true, true, false)]
    fn role_predicate_table(
        #[case] role: Role,
        #[case] admin: bool,
        #[case] contributes: bool,
        #[case] academic: bool,
    ) {
        assert_eq!(role.is_admin(), admin);
        assert_eq!(role.can_contribute(), contributes);
        assert_eq!(role.is_academic(), academic);
    }

    #[test]
    fn only_the_exact_roles_satisfy_the_narrow_predicates() {
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(Role::OrgAdmin.is_org_admin());
        assert!(!Role::SuperAdmin.is_org_admin());
        assert!(!Role::OrgAdmin.is_super_admin());
        assert!(!Role::Admin.is_super_admin());
    }

    #[test]
    fn anonymous_session_predicates_are_false_not_panicking() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert!(!session.is_super_admin());
        assert!(!session.is_org_admin());
        assert!(!session.is_academic());
        assert!(!session.can_contribute());
    }

    #[test]
    fn authenticated_session_exposes_the_role_predicates() {
        let session =
            Session::authenticated(user_with_role(Role::Academic), "token-1".to_string());
        assert!(session.is_authenticated());
        assert!(session.is_academic());
        assert!(session.can_contribute());
        assert!(!session.is_admin());
    }

    #[test]
    fn roles_round_trip_through_their_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::OrgAdmin).unwrap(),
            "\"org_admin\""
        );
        let role: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }

    #[test]
    fn registration_roles_cover_only_the_self_service_set() {
        let role: RegistrationRole = serde_json::from_str("\"contributor\"").unwrap();
        assert_eq!(role, RegistrationRole::Contributor);
        assert!(serde_json::from_str::<RegistrationRole>("\"super_admin\"").is_err());
    }
}
