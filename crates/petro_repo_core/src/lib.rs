pub mod domain;
pub mod navigation;
pub mod ports;
pub mod preview;
pub mod review;
pub mod submission;

pub use domain::{
    AuthPayload, Credentials, Document, DocumentQuery, DocumentStatus, DocumentView,
    NewOrganization, Organization, PersistedSession, Registration, RegistrationRole, Role,
    Session, User, VoteDecision, VoteOutcome,
};
pub use ports::{
    ConfirmationPrompt, Navigator, Notifier, PortError, PortResult, RepositoryApi,
    SessionStorage,
};
