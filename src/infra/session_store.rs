//! File-backed credential storage.
//!
//! The file is a flat JSON object of string entries; the credential lives under
//! `authToken`. Other entries are preserved on save and remove.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::application::session::{Credential, CredentialStore, SessionError};

pub const CREDENTIAL_KEY: &str = "authToken";

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(SessionError::Corrupt {
                path: self.path.clone(),
                reason: "expected a JSON object".to_string(),
            }),
            Err(err) => Err(SessionError::Corrupt {
                path: self.path.clone(),
                reason: err.to_string(),
            }),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let body = serde_json::to_string_pretty(entries).map_err(|err| SessionError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        fs::write(&self.path, body).map_err(|err| self.io_error(err))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        let entries = self.read_entries()?;
        let credential = entries
            .get(CREDENTIAL_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Credential::new);
        debug!(path = %self.path.display(), present = credential.is_some(), "loaded session");
        Ok(credential)
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        entries.insert(
            CREDENTIAL_KEY.to_string(),
            Value::String(credential.as_str().to_string()),
        );
        self.write_entries(&entries)
    }

    /// Drop the credential. A corrupt file is replaced so a logout always succeeds.
    fn remove(&self) -> Result<(), SessionError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(SessionError::Corrupt { reason, .. }) => {
                warn!(path = %self.path.display(), %reason, "replacing unreadable session file");
                return self.write_entries(&Map::new());
            }
            Err(err) => return Err(err),
        };
        if entries.remove(CREDENTIAL_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
