//! services/client/src/adapters/console.rs
//!
//! Terminal implementations of the user-interaction ports: notifications,
//! confirmation prompts, and the navigation seam. These are the explicit
//! replacements for blocking browser dialogs.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use tracing::info;

use petro_repo_core::navigation::NavTarget;
use petro_repo_core::ports::{ConfirmationPrompt, Navigator, Notifier};

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        println!("warning: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

pub struct ConsoleConfirm;

#[async_trait]
impl ConfirmationPrompt for ConsoleConfirm {
    async fn confirm(&self, question: &str) -> bool {
        print!("{question} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// A terminal has no router; navigation requests surface as a log line
/// telling the user where the UI would land.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: NavTarget) {
        info!("navigate -> {target:?}");
    }
}
