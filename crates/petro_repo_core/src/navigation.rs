//! crates/petro_repo_core/src/navigation.rs
//!
//! Role-gated navigation policy: which menu entries an identity sees, which
//! screens it may open, and where a denial lands. Client-side convenience
//! only; the server still authorizes every call it receives.

use crate::domain::{Role, Session};

//=========================================================================================
// Routes and Entries
//=========================================================================================

/// Every route the client can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    DataBank,
    Policy,
    InnovationHub,
    Contact,
    Login,
    Signup,
    UploadDocument,
    SuperAdminDashboard,
    OrgAdminDashboard,
    AdminDashboard,
    AcademicDashboard,
    DocumentReview,
}

/// A visible navigation entry: target plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub target: NavTarget,
    pub label: &'static str,
}

const fn entry(target: NavTarget, label: &'static str) -> NavEntry {
    NavEntry { target, label }
}

/// The public entries every visitor sees, in order. Role-conditional
/// entries are inserted immediately before the final entry.
const BASE_ENTRIES: [NavEntry; 5] = [
    entry(NavTarget::Home, "Home"),
    entry(NavTarget::DataBank, "Data Bank"),
    entry(NavTarget::Policy, "Policy"),
    entry(NavTarget::InnovationHub, "Innovation Hub"),
    entry(NavTarget::Contact, "Contact"),
];

/// Where a denied screen redirects.
pub const DENIED_REDIRECT: NavTarget = NavTarget::Home;

//=========================================================================================
// Policy
//=========================================================================================

/// The ordered menu for the given session.
///
/// Role entries keep a fixed priority: contributor upload, super-admin,
/// org-admin, plain-admin, academic. The plain-admin dashboard shows only
/// when the role is exactly `admin` - org and super admins have their own
/// dashboards and never see a redundant admin link.
pub fn navigation_entries(session: &Session) -> Vec<NavEntry> {
    let mut entries: Vec<NavEntry> = BASE_ENTRIES[..BASE_ENTRIES.len() - 1].to_vec();

    if session.can_contribute() {
        entries.push(entry(NavTarget::UploadDocument, "Upload Document"));
    }
    if session.is_super_admin() {
        entries.push(entry(NavTarget::SuperAdminDashboard, "Super Admin"));
    }
    if session.is_org_admin() {
        entries.push(entry(NavTarget::OrgAdminDashboard, "Organization Admin"));
    }
    if session.role() == Some(Role::Admin) {
        entries.push(entry(NavTarget::AdminDashboard, "Admin Dashboard"));
    }
    if session.is_academic() {
        entries.push(entry(NavTarget::AcademicDashboard, "Academic Dashboard"));
    }

    entries.push(BASE_ENTRIES[BASE_ENTRIES.len() - 1]);
    entries
}

/// Whether the given screen may render for this session.
pub fn may_render(session: &Session, screen: NavTarget) -> bool {
    match screen {
        NavTarget::SuperAdminDashboard => session.is_super_admin(),
        NavTarget::OrgAdminDashboard => session.is_org_admin(),
        NavTarget::AdminDashboard => session.is_admin(),
        NavTarget::AcademicDashboard | NavTarget::DocumentReview => session.is_academic(),
        NavTarget::UploadDocument => session.can_contribute(),
        _ => true,
    }
}

/// Login and signup suppress both navigation and footer chrome,
/// regardless of session state.
pub fn shows_chrome(target: NavTarget) -> bool {
    !matches!(target, NavTarget::Login | NavTarget::Signup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use rstest::rstest;

    fn session_with_role(role: Role) -> Session {
        Session::authenticated(
            User {
                id: 1,
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
                role,
                organization_id: None,
                specialization: None,
            },
            "token-1".to_string(),
        )
    }

    fn targets(session: &Session) -> Vec<NavTarget> {
        navigation_entries(session)
            .into_iter()
            .map(|entry| entry.target)
            .collect()
    }

    #[test]
    fn anonymous_visitors_see_only_the_base_entries() {
        assert_eq!(
            targets(&Session::anonymous()),
            vec![
                NavTarget::Home,
                NavTarget::DataBank,
                NavTarget::Policy,
                NavTarget::InnovationHub,
                NavTarget::Contact,
            ]
        );
    }

    #[test]
    fn role_entries_sit_before_the_final_base_entry_in_priority_order() {
        let entries = targets(&session_with_role(Role::SuperAdmin));
        assert_eq!(
            entries,
            vec![
                NavTarget::Home,
                NavTarget::DataBank,
                NavTarget::Policy,
                NavTarget::InnovationHub,
                NavTarget::UploadDocument,
                NavTarget::SuperAdminDashboard,
                NavTarget::Contact,
            ]
        );
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::OrgAdmin, false)]
    #[case(Role::SuperAdmin, false)]
    #[case(Role::Academic, false)]
    #[case(Role::User, false)]
    fn the_admin_dashboard_entry_is_for_exactly_the_admin_role(
        #[case] role: Role,
        #[case] visible: bool,
    ) {
        let entries = targets(&session_with_role(role));
        assert_eq!(entries.contains(&NavTarget::AdminDashboard), visible);
    }

    #[test]
    fn academics_get_the_upload_and_dashboard_entries() {
        let entries = targets(&session_with_role(Role::Academic));
        assert_eq!(
            entries,
            vec![
                NavTarget::Home,
                NavTarget::DataBank,
                NavTarget::Policy,
                NavTarget::InnovationHub,
                NavTarget::UploadDocument,
                NavTarget::AcademicDashboard,
                NavTarget::Contact,
            ]
        );
    }

    #[rstest]
    #[case(NavTarget::SuperAdminDashboard, Role::SuperAdmin, true)]
    #[case(NavTarget::SuperAdminDashboard, Role::Admin, false)]
    #[case(NavTarget::OrgAdminDashboard, Role::OrgAdmin, true)]
    #[case(NavTarget::OrgAdminDashboard, Role::SuperAdmin, false)]
    #[case(NavTarget::AdminDashboard, Role::OrgAdmin, true)]
    #[case(NavTarget::DocumentReview, Role::Academic, true)]
    #[case(NavTarget::DocumentReview, Role::User, false)]
    #[case(NavTarget::UploadDocument, Role::User, false)]
    #[case(NavTarget::UploadDocument, Role::Contributor, true)]
    fn screen_guards_follow_the_role_predicates(
        #[case] screen: NavTarget,
        #[case] role: Role,
        #[case] allowed: bool,
    ) {
        assert_eq!(may_render(&session_with_role(role), screen), allowed);
    }

    #[test]
    fn guarded_screens_deny_anonymous_sessions() {
        let session = Session::anonymous();
        assert!(!may_render(&session, NavTarget::SuperAdminDashboard));
        assert!(!may_render(&session, NavTarget::DocumentReview));
        assert!(may_render(&session, NavTarget::DataBank));
    }

    #[test]
    fn login_and_signup_suppress_chrome_for_everyone() {
        assert!(!shows_chrome(NavTarget::Login));
        assert!(!shows_chrome(NavTarget::Signup));
        assert!(shows_chrome(NavTarget::Home));
        assert!(shows_chrome(NavTarget::SuperAdminDashboard));
    }
}
