//! Single-post view for readers.

use std::sync::Arc;

use blogdesk_api_types::{PostAuthor, PostId};
use tracing::warn;

use crate::application::repos::PostsRepo;
use crate::application::session::Session;
use crate::domain::content::{excerpt, sanitize_html};
use crate::util::time::format_timestamp;

#[derive(Debug, Clone)]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    /// Sanitized HTML, safe to inject.
    pub html: String,
    pub excerpt: String,
    pub author: PostAuthor,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone)]
pub enum ReaderState {
    Ready(Box<PostView>),
    NotFound,
    Failed(String),
}

pub struct PostReader {
    posts: Arc<dyn PostsRepo>,
    session: Session,
}

impl PostReader {
    pub fn new(posts: Arc<dyn PostsRepo>, session: Session) -> Self {
        Self { posts, session }
    }

    pub async fn open(&self, id: &PostId) -> ReaderState {
        let credential = self.session.get();
        match self.posts.get_post(id, credential.as_ref()).await {
            Ok(post) => ReaderState::Ready(Box::new(PostView {
                html: sanitize_html(&post.content),
                excerpt: excerpt(&post.content),
                created: format_timestamp(&post.created_at),
                updated: format_timestamp(&post.updated_at),
                id: post.id,
                title: post.title,
                author: post.author,
            })),
            Err(err) if err.is_not_found() => ReaderState::NotFound,
            Err(err) => {
                warn!(post = %id, error = %err, "failed to fetch post");
                let message = match err.status_code() {
                    Some(status) => format!("Failed to fetch post: {status}"),
                    None => "Failed to fetch post".to_string(),
                };
                ReaderState::Failed(message)
            }
        }
    }
}
