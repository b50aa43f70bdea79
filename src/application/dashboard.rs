//! Counters shown on the admin and user dashboards.

use std::sync::Arc;

use tracing::debug;

use crate::application::access::Viewer;
use crate::application::error::ViewError;
use crate::application::repos::{AuthRepo, PostsRepo};
use crate::domain::posts::Partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStats {
    Admin {
        drafts: u64,
        published: u64,
        total: u64,
        users: u64,
    },
    User {
        drafts: u64,
        my_posts: u64,
    },
}

#[derive(Clone)]
pub struct DashboardService {
    posts: Arc<dyn PostsRepo>,
    auth: Arc<dyn AuthRepo>,
}

impl DashboardService {
    pub fn new(posts: Arc<dyn PostsRepo>, auth: Arc<dyn AuthRepo>) -> Self {
        Self { posts, auth }
    }

    pub async fn load(&self, viewer: &Viewer) -> Result<DashboardStats, ViewError> {
        let credential = Some(&viewer.credential);
        if !viewer.capabilities.can_view_all_drafts {
            let drafts = self.posts.count_posts(Partition::Drafts, credential).await?;
            let my_posts = self.posts.count_posts(Partition::Mine, credential).await?;
            return Ok(DashboardStats::User { drafts, my_posts });
        }

        let drafts = self
            .posts
            .count_posts(Partition::AllDrafts, credential)
            .await?;
        let published = self
            .posts
            .count_posts(Partition::Published, credential)
            .await?;

        let users = if viewer.capabilities.can_view_user_count {
            match self.auth.count_users(&viewer.credential).await {
                Ok(count) => count,
                Err(err) => {
                    debug!(error = %err, "user count unavailable");
                    0
                }
            }
        } else {
            0
        };

        Ok(DashboardStats::Admin {
            drafts,
            published,
            total: drafts + published,
            users,
        })
    }
}
