//! Mount-time access check for protected screens.

use std::sync::Arc;

use blogdesk_api_types::CurrentUser;
use tracing::{debug, warn};

use crate::application::error::ViewError;
use crate::application::repos::AuthRepo;
use crate::application::session::{Credential, Session};
use crate::domain::access::Capabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
}

/// Signed-in user with capabilities resolved for this session.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user: CurrentUser,
    pub capabilities: Capabilities,
    pub credential: Credential,
}

#[derive(Clone)]
pub struct AccessGuard {
    auth: Arc<dyn AuthRepo>,
    session: Session,
}

impl AccessGuard {
    pub fn new(auth: Arc<dyn AuthRepo>, session: Session) -> Self {
        Self { auth, session }
    }

    /// Resolve the current user against `requirement`.
    ///
    /// A missing credential or one rejected by the identity endpoint yields
    /// `AuthRequired` (the rejected credential is cleared first). A non-admin
    /// reaching an admin screen yields `Forbidden`. Transport failures leave
    /// the credential alone and surface as `Unavailable`.
    pub async fn resolve(&self, requirement: Requirement) -> Result<Viewer, ViewError> {
        let credential = self.session.get().ok_or(ViewError::AuthRequired)?;

        let user = match self.auth.current_user(&credential).await {
            Ok(user) => user,
            Err(err) if err.status_code().is_some() => {
                warn!(error = %err, "identity check rejected credential");
                self.session.clear()?;
                return Err(ViewError::AuthRequired);
            }
            Err(err) => {
                warn!(error = %err, "identity check unavailable");
                return Err(ViewError::Unavailable(err.to_string()));
            }
        };

        let capabilities = Capabilities::for_role(user.role);
        if requirement == Requirement::Admin && !capabilities.can_access_admin {
            debug!(user = %user.username, "non-admin denied admin screen");
            return Err(ViewError::Forbidden);
        }

        Ok(Viewer {
            user,
            capabilities,
            credential,
        })
    }
}
