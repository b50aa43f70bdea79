use thiserror::Error;

use crate::application::notice::{Feedback, Notice};
use crate::application::repos::RepoError;
use crate::application::session::SessionError;
use crate::domain::access::Route;
use crate::domain::error::DomainError;

/// Failure of a view action, before it is turned into user-facing feedback.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("sign in required")]
    AuthRequired,
    #[error("admin access required")]
    Forbidden,
    #[error("another action is still in progress")]
    Busy,
    #[error("{0}")]
    Validation(#[from] DomainError),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Remote(#[from] RepoError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ViewError {
    /// Screen the user is sent to, when the failure is about access rather than data.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            ViewError::AuthRequired => Some(Route::Login),
            ViewError::Forbidden => Some(Route::Home),
            ViewError::Remote(err) if err.is_unauthorized() => Some(Route::Login),
            ViewError::Remote(err) if err.is_forbidden() => Some(Route::Home),
            _ => None,
        }
    }

    /// Message shown to the user, preferring the service's own wording.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ViewError::Remote(RepoError::Status { message, .. }) if !message.is_empty() => {
                format!("{fallback}: {message}")
            }
            ViewError::Remote(_) | ViewError::Session(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Error notice plus any redirect, for actions that report through a toast.
    pub fn feedback(&self, fallback: &str) -> Feedback {
        let feedback = Feedback::notice(Notice::error(self.user_message(fallback)));
        match self.redirect() {
            Some(route) => feedback.then(route),
            None => feedback,
        }
    }
}
