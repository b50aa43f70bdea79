//! Remote service traits the view models talk to.

use async_trait::async_trait;
use blogdesk_api_types::{CurrentUser, Post, PostId, PostPage, PostWriteRequest};
use thiserror::Error;

use crate::application::session::Credential;
use crate::domain::posts::Partition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// The credential was missing, expired or rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }
}

/// Zero-based page index and page size of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(
        &self,
        partition: Partition,
        query: PageQuery,
        credential: Option<&Credential>,
    ) -> Result<PostPage, RepoError>;

    /// `totalElements` of a partition, fetched with a one-item page.
    async fn count_posts(
        &self,
        partition: Partition,
        credential: Option<&Credential>,
    ) -> Result<u64, RepoError>;

    async fn get_post(
        &self,
        id: &PostId,
        credential: Option<&Credential>,
    ) -> Result<Post, RepoError>;

    async fn create_post(
        &self,
        request: &PostWriteRequest,
        credential: &Credential,
    ) -> Result<Post, RepoError>;

    async fn update_post(
        &self,
        id: &PostId,
        request: &PostWriteRequest,
        credential: &Credential,
    ) -> Result<(), RepoError>;

    /// Move a draft into the published partition.
    async fn publish_post(&self, id: &PostId, credential: &Credential) -> Result<(), RepoError>;

    async fn delete_post(&self, id: &PostId, credential: &Credential) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuthRepo: Send + Sync {
    async fn current_user(&self, credential: &Credential) -> Result<CurrentUser, RepoError>;

    async fn count_users(&self, credential: &Credential) -> Result<u64, RepoError>;
}
