//! services/client/src/adapters/session_file.rs
//!
//! File-backed implementation of the `SessionStorage` port. The bearer
//! token and the serialized user record live in a single JSON file, so the
//! pair is always written and removed together.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use petro_repo_core::domain::PersistedSession;
use petro_repo_core::ports::{PortError, PortResult, SessionStorage};

pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> PortResult<Option<PersistedSession>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(map_io_error(error)),
        };
        let session = serde_json::from_str(&content)
            .map_err(|error| PortError::Transport(format!("corrupt session file: {error}")))?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(map_io_error)?;
            }
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|error| PortError::Transport(format!("unwritable session: {error}")))?;
        fs::write(&self.path, content).map_err(map_io_error)
    }

    fn clear(&self) -> PortResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(map_io_error(error)),
        }
    }
}

fn map_io_error(error: std::io::Error) -> PortError {
    PortError::Transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;
    use petro_repo_core::domain::Role;

    #[test]
    fn a_saved_session_loads_back_intact() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));

        let persisted = PersistedSession {
            token: "token-9".to_string(),
            user: sample_user(Role::OrgAdmin),
        };
        storage.save(&persisted).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.token, "token-9");
        assert_eq!(loaded.user.role, Role::OrgAdmin);
        assert_eq!(loaded.user.email, persisted.user.email);
    }

    #[test]
    fn loading_without_a_file_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("missing.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));

        storage
            .save(&PersistedSession {
                token: "token-1".to_string(),
                user: sample_user(Role::User),
            })
            .unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());

        // Clearing an already-clear store must not fail.
        storage.clear().unwrap();
    }

    #[test]
    fn a_corrupt_file_surfaces_as_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileSessionStorage::new(path);
        assert!(storage.load().is_err());
    }
}
