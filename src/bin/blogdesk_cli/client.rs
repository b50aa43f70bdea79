#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::sync::Arc;

use blogdesk::application::access::{AccessGuard, Requirement, Viewer};
use blogdesk::application::error::ViewError;
use blogdesk::application::notice::Feedback;
use blogdesk::application::session::{Session, SessionError};
use blogdesk::config::{self, LoadError, Settings};
use blogdesk::domain::access::Route;
use blogdesk::domain::posts::Partition;
use blogdesk::infra::api_client::HttpBlogApi;
use blogdesk::infra::error::InfraError;
use blogdesk::infra::session_store::FileCredentialStore;
use thiserror::Error;

use crate::args::{Cli, LoginArgs};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("token is required (use --token-file or BLOGDESK_TOKEN)")]
    MissingToken,
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{message}")]
    Rejected {
        message: String,
        route: Option<Route>,
    },
}

impl CliError {
    pub fn rejected(feedback: &Feedback) -> Self {
        Self::Rejected {
            message: feedback.notice.text.clone(),
            route: feedback.navigate.clone(),
        }
    }

    /// Next step for the user when the failure is about access.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Rejected {
                route: Some(Route::Login),
                ..
            } => Some("run `blogdesk login` to sign in"),
            Self::Rejected {
                route: Some(Route::Home),
                ..
            } => Some("this command needs an admin account"),
            _ => None,
        }
    }
}

impl From<ViewError> for CliError {
    fn from(err: ViewError) -> Self {
        Self::rejected(&err.feedback("Request failed"))
    }
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub settings: Settings,
    pub session: Session,
    pub api: Arc<HttpBlogApi>,
    pub json: bool,
}

impl Ctx {
    pub fn new(settings: Settings, json: bool) -> Result<Self, CliError> {
        let session = Session::open(FileCredentialStore::new(&settings.session.path))?;
        let api = Arc::new(HttpBlogApi::new(&settings.api)?);
        Ok(Self {
            settings,
            session,
            api,
            json,
        })
    }

    pub fn guard(&self) -> AccessGuard {
        AccessGuard::new(self.api.clone(), self.session.clone())
    }

    pub async fn viewer(&self, requirement: Requirement) -> Result<Viewer, CliError> {
        Ok(self.guard().resolve(requirement).await?)
    }

    /// Configured page size for a partition's listing.
    pub fn page_size(&self, partition: Partition) -> u32 {
        let listing = &self.settings.listing;
        match partition {
            Partition::Published => listing.public_page_size.get(),
            Partition::Drafts | Partition::Mine => listing.drafts_page_size.get(),
            Partition::AllDrafts => listing.admin_page_size.get(),
        }
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(cli.config_file.as_deref(), &cli.overrides)?)
}

pub fn read_token(args: &LoginArgs) -> Result<String, CliError> {
    let token = if let Some(path) = &args.token_file {
        fs::read_to_string(path)
            .map_err(CliError::TokenFile)?
            .trim()
            .to_string()
    } else {
        args.token_env
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };
    if token.is_empty() {
        return Err(CliError::MissingToken);
    }
    Ok(token)
}
