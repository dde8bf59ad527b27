//! services/client/src/bin/nptr.rs

use clap::{Parser, Subcommand};
use client_lib::{
    adapters::{
        ConsoleConfirm, ConsoleNavigator, ConsoleNotifier, FileSessionStorage,
        HttpRepositoryApi,
    },
    config::Config,
    error::ClientError,
    flows::{
        admin, auth, documents,
        documents::DocumentScreen,
        review::{ReviewScreen, VoteError},
        submission::{SubmissionFlow, SubmitError},
        AppState,
    },
    session::SessionHandle,
};
use petro_repo_core::domain::{
    Credentials, Document, DocumentQuery, NewOrganization, Organization, Registration,
    RegistrationRole, VoteDecision,
};
use petro_repo_core::navigation::{self, NavTarget};
use petro_repo_core::preview::PreviewContent;
use petro_repo_core::review::PANEL_REVIEW;
use petro_repo_core::submission::{DocumentDraft, FilePayload};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nptr", about = "National Petroleum Technology Repository client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with an email and password
    Login { email: String, password: String },
    /// Create an account (self-service roles only)
    Register {
        name: String,
        email: String,
        password: String,
        /// Requested role: user or contributor
        #[arg(long, default_value = "user", value_parser = parse_registration_role)]
        role: RegistrationRole,
        #[arg(long)]
        organization_id: Option<i64>,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the current identity and its role predicates
    Whoami,
    /// Show the navigation entries visible to the current identity
    Nav,
    /// List or search documents
    Documents {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "type")]
        file_type: Option<String>,
        #[arg(long)]
        year: Option<u16>,
    },
    /// Show one document with its review progress
    Show { id: i64 },
    /// Upload a document
    Upload {
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Use the strict legacy constraints (10 MiB, PDF/DOC/DOCX)
        #[arg(long)]
        strict: bool,
    },
    /// Preview a document's content
    Preview { id: i64 },
    /// Download a document's file
    Download {
        id: i64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Cast a review vote on a pending document
    Vote {
        id: i64,
        #[arg(value_parser = parse_decision)]
        decision: VoteDecision,
    },
    /// Plain-admin operations
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Organization management
    #[command(subcommand)]
    Orgs(OrgCommand),
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List documents awaiting review
    Pending,
    /// Finalize a document as approved
    Approve { id: i64 },
    /// Finalize a document as rejected
    Reject { id: i64 },
    /// Delete a document
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum OrgCommand {
    List,
    Show {
        id: i64,
    },
    Users {
        id: i64,
    },
    Create {
        name: String,
        short_name: String,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    Activate {
        id: i64,
    },
    Deactivate {
        id: i64,
    },
}

fn parse_decision(raw: &str) -> Result<VoteDecision, String> {
    match raw.to_ascii_lowercase().as_str() {
        "approve" => Ok(VoteDecision::Approve),
        "reject" => Ok(VoteDecision::Reject),
        _ => Err("expected 'approve' or 'reject'".to_string()),
    }
}

fn parse_registration_role(raw: &str) -> Result<RegistrationRole, String> {
    match raw.to_ascii_lowercase().as_str() {
        "user" => Ok(RegistrationRole::User),
        "contributor" => Ok(RegistrationRole::Contributor),
        _ => Err("expected 'user' or 'contributor'".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- 2. Rehydrate the Session from Durable Storage ---
    let storage = Arc::new(FileSessionStorage::new(config.session_path.clone()));
    let session = SessionHandle::rehydrate(storage);

    // --- 3. Initialize Adapters & Shared State ---
    let navigator = Arc::new(ConsoleNavigator);
    let api = HttpRepositoryApi::new(
        config.api_base_url.clone(),
        config.request_timeout,
        session.clone(),
        navigator.clone(),
    )
    .map_err(|error| ClientError::Internal(format!("failed to build HTTP client: {error}")))?;

    let state = AppState {
        api: Arc::new(api),
        session,
        navigator,
        notifier: Arc::new(ConsoleNotifier),
        confirm: Arc::new(ConsoleConfirm),
        config: config.clone(),
    };

    // --- 4. Dispatch the Command ---
    let cli = Cli::parse();
    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login { email, password } => {
            let session = auth::login(state, &Credentials { email, password }).await?;
            if let Some(user) = session.user {
                state
                    .notifier
                    .success(&format!("Signed in as {} ({:?})", user.name, user.role));
            }
        }
        Command::Register {
            name,
            email,
            password,
            role,
            organization_id,
            specialization,
        } => {
            let registration = Registration {
                name,
                email,
                password,
                role,
                organization_id,
                specialization,
            };
            let session = auth::register(state, &registration).await?;
            if let Some(user) = session.user {
                state
                    .notifier
                    .success(&format!("Welcome, {} ({:?})", user.name, user.role));
            }
        }
        Command::Logout => {
            auth::logout(state).await;
            state.notifier.success("Signed out");
        }
        Command::Whoami => {
            let session = state.session.snapshot();
            match &session.user {
                Some(user) => {
                    println!("{} <{}>", user.name, user.email);
                    println!("role: {:?}", user.role);
                    println!("admin: {}", session.is_admin());
                    println!("academic reviewer: {}", session.is_academic());
                    println!("may upload: {}", session.can_contribute());
                }
                None => println!("Not signed in"),
            }
        }
        Command::Nav => {
            let session = state.session.snapshot();
            for entry in navigation::navigation_entries(&session) {
                println!("{}", entry.label);
            }
        }
        Command::Documents {
            search,
            category,
            file_type,
            year,
        } => {
            let query = DocumentQuery {
                search,
                category,
                file_type,
                year,
            };
            for document in documents::browse(state, &query).await? {
                print_document_line(&document);
            }
        }
        Command::Show { id } => match documents::open(state, id).await? {
            DocumentScreen::Found(view) => {
                print_document(&view.document);
                match view.current_user_vote {
                    Some(decision) => println!("your vote: {decision:?}"),
                    None => println!("your vote: none"),
                }
            }
            DocumentScreen::NotFound => {
                state
                    .notifier
                    .warn(&format!("Document #{id} is not available"));
            }
        },
        Command::Upload {
            path,
            title,
            category,
            description,
            strict,
        } => {
            if !auth::guard_screen(state, NavTarget::UploadDocument) {
                state.notifier.error("Your role cannot upload documents");
                return Ok(());
            }
            let content = tokio::fs::read(&path).await?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("document")
                .to_string();
            let file = FilePayload::new(file_name, content.into());
            let draft = DocumentDraft {
                title,
                category,
                description,
            };

            let flow = if strict {
                SubmissionFlow::strict()
            } else {
                SubmissionFlow::general()
            };
            match flow.submit(state, &draft, Some(&file)).await {
                Ok(document) => {
                    state.notifier.success(&format!(
                        "Submitted #{} \"{}\" ({:?})",
                        document.id, document.title, document.status
                    ));
                }
                Err(SubmitError::Validation(error)) => state.notifier.error(&error.to_string()),
                Err(SubmitError::Api(error)) => state.notifier.error(&error.to_string()),
            }
        }
        Command::Preview { id } => match documents::open(state, id).await? {
            DocumentScreen::Found(view) => {
                let cancel = tokio_util::sync::CancellationToken::new();
                let content = documents::preview(state, &view.document, cancel).await?;
                print_preview(&content);
            }
            DocumentScreen::NotFound => {
                state
                    .notifier
                    .warn(&format!("Document #{id} is not available"));
            }
        },
        Command::Download { id, out } => match documents::open(state, id).await? {
            DocumentScreen::Found(view) => {
                let bytes = documents::download(state, id).await?;
                let target = out.unwrap_or_else(|| PathBuf::from(&view.document.file_name));
                tokio::fs::write(&target, &bytes).await?;
                state
                    .notifier
                    .success(&format!("Saved {} bytes to {}", bytes.len(), target.display()));
            }
            DocumentScreen::NotFound => {
                state
                    .notifier
                    .warn(&format!("Document #{id} is not available"));
            }
        },
        Command::Vote { id, decision } => {
            if !auth::guard_screen(state, NavTarget::DocumentReview) {
                state.notifier.error("Your role cannot review documents");
                return Ok(());
            }
            let mut screen = ReviewScreen::open(state, id).await?;
            match screen.cast_vote(state, decision).await {
                Ok(outcome) => {
                    println!(
                        "status: {:?} ({} approvals, {} rejections)",
                        outcome.status, outcome.approve_votes_count, outcome.reject_votes_count
                    );
                }
                Err(VoteError::Api(error)) => state.notifier.error(&error.to_string()),
                Err(error) => state.notifier.warn(&error.to_string()),
            }
        }
        Command::Admin(command) => {
            if !auth::guard_screen(state, NavTarget::AdminDashboard) {
                state.notifier.error("Your role cannot manage documents");
                return Ok(());
            }
            run_admin(state, command).await?;
        }
        Command::Orgs(command) => {
            if !auth::guard_screen(state, NavTarget::AdminDashboard) {
                state.notifier.error("Your role cannot manage organizations");
                return Ok(());
            }
            run_orgs(state, command).await?;
        }
    }
    Ok(())
}

async fn run_admin(state: &AppState, command: AdminCommand) -> Result<(), ClientError> {
    match command {
        AdminCommand::Pending => {
            for document in admin::pending_queue(state).await? {
                print_document_line(&document);
            }
        }
        AdminCommand::Approve { id } => {
            if let Some(document) = admin::decide(state, id, VoteDecision::Approve).await? {
                state
                    .notifier
                    .success(&format!("Document #{} is now {:?}", document.id, document.status));
            }
        }
        AdminCommand::Reject { id } => {
            if let Some(document) = admin::decide(state, id, VoteDecision::Reject).await? {
                state
                    .notifier
                    .success(&format!("Document #{} is now {:?}", document.id, document.status));
            }
        }
        AdminCommand::Delete { id } => {
            if admin::delete_document(state, id).await? {
                state.notifier.success(&format!("Document #{id} deleted"));
            }
        }
    }
    Ok(())
}

async fn run_orgs(state: &AppState, command: OrgCommand) -> Result<(), ClientError> {
    match command {
        OrgCommand::List => {
            for organization in admin::organizations(state).await? {
                print_organization(&organization);
            }
        }
        OrgCommand::Show { id } => {
            print_organization(&admin::organization(state, id).await?);
        }
        OrgCommand::Users { id } => {
            for user in admin::organization_members(state, id).await? {
                println!("#{} {} <{}> {:?}", user.id, user.name, user.email, user.role);
            }
        }
        OrgCommand::Create {
            name,
            short_name,
            kind,
            contact_email,
            website,
        } => {
            let organization = admin::create_organization(
                state,
                &NewOrganization {
                    name,
                    short_name,
                    kind,
                    contact_email,
                    website,
                },
            )
            .await?;
            state
                .notifier
                .success(&format!("Created organization #{}", organization.id));
        }
        OrgCommand::Activate { id } => {
            if let Some(organization) = admin::set_organization_active(state, id, true).await? {
                state
                    .notifier
                    .success(&format!("{} is now active", organization.name));
            }
        }
        OrgCommand::Deactivate { id } => {
            if let Some(organization) = admin::set_organization_active(state, id, false).await? {
                state
                    .notifier
                    .success(&format!("{} is now inactive", organization.name));
            }
        }
    }
    Ok(())
}

fn print_organization(organization: &Organization) {
    println!(
        "#{} {} ({}) [{}] {}",
        organization.id,
        organization.name,
        organization.short_name,
        organization.kind,
        if organization.is_active {
            "active"
        } else {
            "inactive"
        }
    );
}

fn print_document_line(document: &Document) {
    println!(
        "#{} [{:?}] {} ({}, {} bytes)",
        document.id, document.status, document.title, document.file_type, document.file_size
    );
}

fn print_document(document: &Document) {
    print_document_line(document);
    println!("category: {}", document.category);
    println!("uploaded by: {}", document.uploader);
    if let Some(description) = &document.description {
        println!("{description}");
    }
    println!(
        "approvals: {}/{} ({:.0}%), rejections: {}/{}",
        document.approve_votes_count,
        PANEL_REVIEW.approval_quorum,
        PANEL_REVIEW.approval_progress(document.approve_votes_count),
        document.reject_votes_count,
        PANEL_REVIEW.rejection_ceiling,
    );
}

fn print_preview(content: &PreviewContent) {
    match content {
        PreviewContent::Pdf => {
            println!("Binary document; use `nptr download` and an external viewer.");
        }
        PreviewContent::Structured(value) => {
            match serde_json::to_string_pretty(value) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{value}"),
            }
        }
        PreviewContent::Table(table) => {
            println!("{}", table.headers().join(" | "));
            for row in table.visible_rows() {
                println!("{}", row.join(" | "));
            }
            if let Some(notice) = table.truncation_notice() {
                println!("{notice}");
            }
        }
        PreviewContent::Text(text) => println!("{text}"),
        PreviewContent::Unsupported { file_name } => {
            println!("No preview for {file_name}; download it instead.");
        }
        PreviewContent::Unavailable => println!("Preview not available."),
    }
}
