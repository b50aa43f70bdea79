//! Paginated listing of one post partition.
//!
//! The displayed window only changes through a new fetch; envelopes are never
//! sliced or patched locally. Each `load` takes a request token and its
//! result is applied only while that token is still the latest issued, so a
//! slow earlier response cannot overwrite a newer page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use blogdesk_api_types::{PostId, PostPage};
use tracing::{debug, info, warn};

use crate::application::error::ViewError;
use crate::application::notice::{Feedback, Notice};
use crate::application::repos::{PageQuery, PostsRepo};
use crate::application::session::{Credential, Session};
use crate::domain::posts::Partition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub partition: Partition,
    pub page_index: u32,
    pub status: ListStatus,
    pub page: Option<Arc<PostPage>>,
}

impl ListSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, ListStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ListStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn ids(&self) -> Vec<PostId> {
        self.page
            .as_ref()
            .map(|page| page.content.iter().map(|post| post.id.clone()).collect())
            .unwrap_or_default()
    }

    /// "Previous" is enabled only when the held envelope is not the first page.
    pub fn can_go_previous(&self) -> bool {
        self.page.as_ref().is_some_and(|page| !page.first)
    }

    /// "Next" is enabled only when the held envelope is not the last page.
    pub fn can_go_next(&self) -> bool {
        self.page.as_ref().is_some_and(|page| !page.last)
    }
}

/// Whether a finished load was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Superseded,
}

struct ListState {
    page_index: u32,
    status: ListStatus,
    page: Option<Arc<PostPage>>,
}

pub struct ListViewModel {
    posts: Arc<dyn PostsRepo>,
    session: Session,
    partition: Partition,
    page_size: u32,
    latest_request: AtomicU64,
    state: Mutex<ListState>,
}

impl ListViewModel {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        session: Session,
        partition: Partition,
        page_size: u32,
    ) -> Self {
        Self {
            posts,
            session,
            partition,
            page_size,
            latest_request: AtomicU64::new(0),
            state: Mutex::new(ListState {
                page_index: 0,
                status: ListStatus::Idle,
                page: None,
            }),
        }
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn posts(&self) -> &Arc<dyn PostsRepo> {
        &self.posts
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state();
        ListSnapshot {
            partition: self.partition,
            page_index: state.page_index,
            status: state.status.clone(),
            page: state.page.clone(),
        }
    }

    /// Credential required for this partition, or `None` for the public listing.
    pub(crate) fn credential(&self) -> Result<Option<Credential>, ViewError> {
        let credential = self.session.get();
        if self.partition.requires_credential() && credential.is_none() {
            return Err(ViewError::AuthRequired);
        }
        Ok(credential)
    }

    /// Fetch page `page` of the partition and replace the displayed window.
    ///
    /// On failure the previously displayed page is cleared and the error kept
    /// in the snapshot; the returned error carries the same cause.
    pub async fn load(&self, page: u32) -> Result<LoadOutcome, ViewError> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.page_index = page;
            state.status = ListStatus::Loading;
        }

        let credential = match self.credential() {
            Ok(credential) => credential,
            Err(err) => {
                self.apply_failure(token, &err);
                return Err(err);
            }
        };

        debug!(partition = %self.partition, page, size = self.page_size, token, "loading posts");
        let query = PageQuery::new(page, self.page_size);
        let result = self
            .posts
            .list_posts(self.partition, query, credential.as_ref())
            .await;

        match result {
            Ok(envelope) => {
                let mut state = self.state();
                if !self.is_latest(token) {
                    debug!(
                        partition = %self.partition,
                        page,
                        token,
                        "discarding stale listing response"
                    );
                    return Ok(LoadOutcome::Superseded);
                }
                state.page_index = envelope.number;
                state.status = ListStatus::Ready;
                state.page = Some(Arc::new(envelope));
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                let err = ViewError::from(err);
                if !self.is_latest(token) {
                    debug!(
                        partition = %self.partition,
                        page,
                        token,
                        "discarding stale listing failure"
                    );
                    return Ok(LoadOutcome::Superseded);
                }
                warn!(partition = %self.partition, page, error = %err, "failed to load posts");
                self.apply_failure(token, &err);
                Err(err)
            }
        }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token
    }

    fn apply_failure(&self, token: u64, err: &ViewError) {
        if !self.is_latest(token) {
            return;
        }
        let message = err.user_message(&format!("Failed to load {}", self.partition.noun()));
        let mut state = self.state();
        state.status = ListStatus::Failed(message);
        state.page = None;
    }

    pub async fn reload(&self) -> Result<LoadOutcome, ViewError> {
        let page = self.state().page_index;
        self.load(page).await
    }

    /// Advance one page when the held envelope allows it; `None` when "Next" is disabled.
    pub async fn next_page(&self) -> Option<Result<LoadOutcome, ViewError>> {
        let snapshot = self.snapshot();
        if !snapshot.can_go_next() {
            return None;
        }
        Some(self.load(snapshot.page_index + 1).await)
    }

    /// Step back one page when the held envelope allows it; `None` when "Previous" is disabled.
    pub async fn previous_page(&self) -> Option<Result<LoadOutcome, ViewError>> {
        let snapshot = self.snapshot();
        if !snapshot.can_go_previous() {
            return None;
        }
        Some(self.load(snapshot.page_index.saturating_sub(1)).await)
    }

    /// Delete a post, then reload the page currently shown.
    pub async fn delete(&self, id: &PostId) -> Result<Feedback, ViewError> {
        let credential = self.session.get().ok_or(ViewError::AuthRequired)?;
        self.posts.delete_post(id, &credential).await?;
        info!(partition = %self.partition, post = %id, "post deleted");
        let noun = if self.partition.holds_drafts() {
            "Draft"
        } else {
            "Post"
        };
        let feedback = Feedback::notice(Notice::success(format!("{noun} deleted successfully")));
        if let Err(err) = self.reload().await {
            warn!(partition = %self.partition, error = %err, "reload after delete failed");
        }
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;
    use crate::application::session::MemoryCredentialStore;
    use crate::application::testing::{Call, FakeBlog, credential};

    fn signed_in() -> Session {
        Session::open(MemoryCredentialStore::with(credential())).expect("session")
    }

    fn view(fake: &Arc<FakeBlog>, partition: Partition, size: u32) -> ListViewModel {
        ListViewModel::new(fake.clone(), signed_in(), partition, size)
    }

    #[tokio::test]
    async fn first_page_of_three_enables_only_next() {
        let fake = Arc::new(FakeBlog::with_posts(0, 12));
        let list = view(&fake, Partition::Published, 5);

        assert_eq!(list.load(0).await.expect("load"), LoadOutcome::Applied);

        let snapshot = list.snapshot();
        let page = snapshot.page.clone().expect("page held");
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.len(), 5);
        assert!(snapshot.can_go_next());
        assert!(!snapshot.can_go_previous());
        assert_eq!(snapshot.status, ListStatus::Ready);
    }

    #[tokio::test]
    async fn every_valid_index_yields_matching_envelope() {
        let fake = Arc::new(FakeBlog::with_posts(0, 12));
        let list = view(&fake, Partition::Published, 5);

        for n in 0..3 {
            list.load(n).await.expect("load");
            let page = list.snapshot().page.expect("page held");
            assert_eq!(page.number, n);
            assert_eq!(page.first, n == 0);
            assert_eq!(page.last, n == page.total_pages - 1);
        }
    }

    #[tokio::test]
    async fn next_is_a_no_op_on_last_page() {
        let fake = Arc::new(FakeBlog::with_posts(0, 7));
        let list = view(&fake, Partition::Published, 5);
        list.load(1).await.expect("load");

        assert!(list.next_page().await.is_none());
        let previous = list.previous_page().await.expect("previous enabled");
        previous.expect("load");
        assert_eq!(list.snapshot().page_index, 0);
        assert!(list.previous_page().await.is_none());
    }

    #[tokio::test]
    async fn failure_clears_previous_page() {
        let fake = Arc::new(FakeBlog::with_posts(3, 0));
        let list = view(&fake, Partition::Drafts, 5);
        list.load(0).await.expect("load");
        assert!(list.snapshot().page.is_some());

        fake.fail_list(RepoError::status(500, ""));
        let err = list.reload().await.expect_err("failure surfaced");
        assert!(matches!(err, ViewError::Remote(_)));

        let snapshot = list.snapshot();
        assert!(snapshot.page.is_none());
        assert_eq!(snapshot.error(), Some("Failed to load drafts"));
    }

    #[tokio::test]
    async fn reload_recovers_after_failure() {
        let fake = Arc::new(FakeBlog::with_posts(3, 0));
        let list = view(&fake, Partition::Drafts, 5);
        fake.fail_list(RepoError::status(503, ""));
        list.load(0).await.expect_err("service down");

        fake.heal_list();
        list.reload().await.expect("reload");
        let snapshot = list.snapshot();
        assert!(snapshot.error().is_none());
        assert_eq!(snapshot.ids().len(), 3);
    }

    #[tokio::test]
    async fn protected_partition_without_credential_issues_no_request() {
        let fake = Arc::new(FakeBlog::with_posts(3, 0));
        let list = ListViewModel::new(fake.clone(), Session::anonymous(), Partition::Drafts, 5);

        let err = list.load(0).await.expect_err("auth required");
        assert!(matches!(err, ViewError::AuthRequired));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let fake = Arc::new(FakeBlog::with_posts(0, 12));
        let list = view(&fake, Partition::Published, 5);
        let release_first = fake.gate_next_list();

        let slow = list.load(0);
        let fast = async {
            let outcome = list.load(1).await;
            let _ = release_first.send(());
            outcome
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(fast.expect("fast load"), LoadOutcome::Applied);
        assert_eq!(slow.expect("slow load"), LoadOutcome::Superseded);
        let snapshot = list.snapshot();
        assert_eq!(snapshot.page_index, 1);
        assert_eq!(snapshot.page.expect("page").number, 1);
    }

    #[tokio::test]
    async fn delete_reloads_same_page() {
        let fake = Arc::new(FakeBlog::with_posts(6, 0));
        let list = view(&fake, Partition::Drafts, 5);
        list.load(1).await.expect("load");
        let victim = list.snapshot().ids()[0].clone();

        let feedback = list.delete(&victim).await.expect("delete");
        assert_eq!(feedback.notice.text, "Draft deleted successfully");

        let snapshot = list.snapshot();
        assert_eq!(snapshot.page_index, 1);
        assert!(snapshot.ids().is_empty());
        assert_eq!(
            fake.calls().last(),
            Some(&Call::List(Partition::Drafts, PageQuery::new(1, 5)))
        );
    }

    #[tokio::test]
    async fn failed_delete_keeps_list() {
        let fake = Arc::new(FakeBlog::with_posts(2, 0));
        let list = view(&fake, Partition::Drafts, 5);
        list.load(0).await.expect("load");
        fake.fail_delete(RepoError::status(500, ""));

        let victim = list.snapshot().ids()[0].clone();
        assert!(list.delete(&victim).await.is_err());
        assert_eq!(list.snapshot().ids().len(), 2);
    }
}
