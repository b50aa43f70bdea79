//! Selection of drafts on the displayed page and bulk publishing.
//!
//! Publishing is not atomic across the selection: each id is an independent
//! request. The outcome only distinguishes "all succeeded" from "at least one
//! failed"; publishes that went through are not rolled back.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use blogdesk_api_types::PostId;
use futures::future::join_all;
use tracing::{info, warn};

use crate::application::error::ViewError;
use crate::application::listing::{ListViewModel, LoadOutcome};
use crate::application::notice::{Feedback, Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPublishOutcome {
    /// Nothing was selected; no request was issued.
    Skipped,
    Published { count: usize },
    Failed { attempted: usize, failed: usize },
}

impl BulkPublishOutcome {
    pub fn feedback(&self) -> Option<Feedback> {
        match *self {
            BulkPublishOutcome::Skipped => None,
            BulkPublishOutcome::Published { count } => Some(Feedback::notice(Notice::success(
                format!("Published {count} draft(s)!"),
            ))),
            BulkPublishOutcome::Failed { attempted, failed } => {
                Some(Feedback::notice(Notice::error(format!(
                    "Failed to publish drafts ({failed} of {attempted} requests failed)"
                ))))
            }
        }
    }
}

/// Clears the busy flag when the guarded action ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ViewError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ViewError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SelectionController {
    list: Arc<ListViewModel>,
    selected: Mutex<BTreeSet<PostId>>,
    busy: AtomicBool,
}

impl SelectionController {
    pub fn new(list: Arc<ListViewModel>) -> Self {
        Self {
            list,
            selected: Mutex::new(BTreeSet::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn list(&self) -> &Arc<ListViewModel> {
        &self.list
    }

    fn selected_mut(&self) -> MutexGuard<'_, BTreeSet<PostId>> {
        self.selected.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn selected(&self) -> Vec<PostId> {
        self.selected_mut().iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &PostId) -> bool {
        self.selected_mut().contains(id)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The publish action is enabled only with a selection and no publish in flight.
    pub fn can_publish(&self) -> bool {
        !self.selected_mut().is_empty() && !self.is_busy()
    }

    /// Flip membership of `id`; returns whether it is selected afterwards.
    pub fn toggle_select(&self, id: PostId) -> bool {
        let mut selected = self.selected_mut();
        if selected.remove(&id) {
            false
        } else {
            selected.insert(id);
            true
        }
    }

    /// Clear the selection when the whole page is selected, otherwise select the whole page.
    pub fn toggle_select_all(&self) {
        let page_ids = self.list.snapshot().ids();
        let mut selected = self.selected_mut();
        let all_selected = !page_ids.is_empty() && page_ids.iter().all(|id| selected.contains(id));
        if all_selected {
            selected.clear();
        } else {
            *selected = page_ids.into_iter().collect();
        }
    }

    pub fn clear(&self) {
        self.selected_mut().clear();
    }

    /// Change page; the selection belongs to the page it was made on and is dropped.
    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome, ViewError> {
        self.clear();
        self.list.load(page).await
    }

    pub async fn next_page(&self) -> Option<Result<LoadOutcome, ViewError>> {
        let result = self.list.next_page().await;
        if result.is_some() {
            self.clear();
        }
        result
    }

    pub async fn previous_page(&self) -> Option<Result<LoadOutcome, ViewError>> {
        let result = self.list.previous_page().await;
        if result.is_some() {
            self.clear();
        }
        result
    }

    /// Publish every selected draft concurrently and wait for all of them.
    pub async fn publish_selected(&self) -> Result<BulkPublishOutcome, ViewError> {
        let ids = self.selected();
        if ids.is_empty() {
            return Ok(BulkPublishOutcome::Skipped);
        }

        let _busy = BusyGuard::acquire(&self.busy)?;
        let credential = self.list.session().get().ok_or(ViewError::AuthRequired)?;
        let posts = self.list.posts();

        let results = join_all(ids.iter().map(|id| posts.publish_post(id, &credential))).await;
        let failed = results
            .iter()
            .zip(ids.iter())
            .filter_map(|(result, id)| result.as_ref().err().map(|err| (id, err)))
            .inspect(|(id, err)| warn!(post = %id, error = %err, "publish request failed"))
            .count();

        if failed > 0 {
            warn!(attempted = ids.len(), failed, "bulk publish incomplete");
            return Ok(BulkPublishOutcome::Failed {
                attempted: ids.len(),
                failed,
            });
        }

        info!(count = ids.len(), "bulk publish complete");
        self.clear();
        if let Err(err) = self.list.reload().await {
            warn!(error = %err, "reload after bulk publish failed");
        }
        Ok(BulkPublishOutcome::Published { count: ids.len() })
    }

    /// Publish a single draft from its row action.
    pub async fn publish_one(&self, id: &PostId) -> Result<Feedback, ViewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let credential = self.list.session().get().ok_or(ViewError::AuthRequired)?;
        self.list.posts().publish_post(id, &credential).await?;
        info!(post = %id, "post published");
        self.selected_mut().remove(id);
        if let Err(err) = self.list.reload().await {
            warn!(error = %err, "reload after publish failed");
        }
        Ok(Feedback::notice(Notice::success("Post published successfully!")))
    }
}
