//! Process-wide session context holding the bearer credential.
//!
//! Every view reads the credential from here instead of poking the store
//! directly. Logout and invalid-credential detection go through
//! [`Session::clear`], which notifies all subscribers so views react to the
//! same change.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

/// Opaque bearer token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access credential store at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("credential store at {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("credential must not be empty")]
    EmptyCredential,
}

/// Persistent storage for the credential, keyed the way browser storage is.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, SessionError>;
    fn save(&self, credential: &Credential) -> Result<(), SessionError>;
    fn remove(&self) -> Result<(), SessionError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn with(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        Ok(())
    }
}

struct SessionInner {
    store: Box<dyn CredentialStore>,
    changes: watch::Sender<Option<Credential>>,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Read the stored credential once and start tracking it.
    pub fn open(store: impl CredentialStore + 'static) -> Result<Self, SessionError> {
        let current = store.load()?;
        debug!(authenticated = current.is_some(), "session opened");
        let (changes, _) = watch::channel(current);
        Ok(Self {
            inner: Arc::new(SessionInner {
                store: Box::new(store),
                changes,
            }),
        })
    }

    pub fn anonymous() -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                store: Box::new(MemoryCredentialStore::default()),
                changes,
            }),
        }
    }

    pub fn get(&self) -> Option<Credential> {
        self.inner.changes.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.changes.borrow().is_some()
    }

    pub fn set(&self, credential: Credential) -> Result<(), SessionError> {
        if credential.as_str().trim().is_empty() {
            return Err(SessionError::EmptyCredential);
        }
        self.inner.store.save(&credential)?;
        self.inner.changes.send_replace(Some(credential));
        info!("credential stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.inner.store.remove()?;
        let previous = self.inner.changes.send_replace(None);
        if previous.is_some() {
            info!("credential cleared");
        }
        Ok(())
    }

    /// Receiver that yields on every `set` or `clear`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.inner.changes.subscribe()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
