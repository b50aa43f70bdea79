//! Create/edit form for a single post.
//!
//! `Idle → Loading (edit only) → Ready → Saving → Ready`. Publishing from the
//! editor is a save followed by the publish transition; the second request is
//! only sent once the first has succeeded.

use std::sync::{Arc, Mutex, MutexGuard};

use blogdesk_api_types::{PostId, PostWriteRequest};
use tracing::{info, warn};

use crate::application::error::ViewError;
use crate::application::notice::{Feedback, Notice};
use crate::application::repos::PostsRepo;
use crate::application::session::{Credential, Session};
use crate::domain::access::Capabilities;
use crate::domain::content::validate_draft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(PostId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Loading,
    Ready,
    Saving,
}

#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    pub mode: EditorMode,
    pub state: EditorState,
    pub title: String,
    pub content: String,
}

struct Form {
    mode: EditorMode,
    state: EditorState,
    title: String,
    content: String,
}

pub struct EditorViewModel {
    posts: Arc<dyn PostsRepo>,
    session: Session,
    capabilities: Capabilities,
    form: Mutex<Form>,
}

impl EditorViewModel {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        session: Session,
        capabilities: Capabilities,
        mode: EditorMode,
    ) -> Self {
        Self {
            posts,
            session,
            capabilities,
            form: Mutex::new(Form {
                mode,
                state: EditorState::Idle,
                title: String::new(),
                content: String::new(),
            }),
        }
    }

    fn form(&self) -> MutexGuard<'_, Form> {
        self.form.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let form = self.form();
        EditorSnapshot {
            mode: form.mode.clone(),
            state: form.state,
            title: form.title.clone(),
            content: form.content.clone(),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.form().title = title.into();
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.form().content = content.into();
    }

    /// Save/publish buttons are enabled only when idle and the form validates.
    pub fn can_submit(&self) -> bool {
        let form = self.form();
        form.state == EditorState::Ready && validate_draft(&form.title, &form.content).is_ok()
    }

    /// Prepare the form; in edit mode this fetches the existing post.
    pub async fn open(&self) -> Result<(), ViewError> {
        let id = {
            let mut form = self.form();
            match form.mode.clone() {
                EditorMode::Create => {
                    form.state = EditorState::Ready;
                    return Ok(());
                }
                EditorMode::Edit(id) => {
                    form.state = EditorState::Loading;
                    id
                }
            }
        };

        let credential = self.session.get();
        match self.posts.get_post(&id, credential.as_ref()).await {
            Ok(post) => {
                let mut form = self.form();
                form.title = post.title;
                form.content = post.content;
                form.state = EditorState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(post = %id, error = %err, "failed to load post for editing");
                self.form().state = EditorState::Idle;
                Err(err.into())
            }
        }
    }

    /// Error toast plus the listing to fall back to when `open` fails.
    pub fn load_failure_feedback(&self, err: &ViewError) -> Feedback {
        let feedback = err.feedback("Failed to load post");
        if feedback.navigate.is_some() {
            return feedback;
        }
        feedback.then(self.capabilities.drafts_route())
    }

    /// Persist the form. Create mode navigates to the role's listing; edit mode stays.
    pub async fn save(&self) -> Result<Feedback, ViewError> {
        let (request, credential) = self.begin_submit()?;
        let result = self.persist(&request, &credential).await;
        self.form().state = EditorState::Ready;

        let (id, created) = result?;
        if created {
            info!(post = %id, "draft created");
            Ok(Feedback::notice(Notice::success("Post saved as draft!"))
                .then(self.capabilities.drafts_route()))
        } else {
            info!(post = %id, "post saved");
            Ok(Feedback::notice(Notice::success("Post saved successfully!")))
        }
    }

    /// Save, then publish. A failed save means no publish request is sent.
    pub async fn publish(&self) -> Result<Feedback, ViewError> {
        let (request, credential) = self.begin_submit()?;
        let result = async {
            let (id, _) = self.persist(&request, &credential).await?;
            self.posts.publish_post(&id, &credential).await?;
            Ok::<_, ViewError>(id)
        }
        .await;
        self.form().state = EditorState::Ready;

        let id = result?;
        info!(post = %id, "post published from editor");
        Ok(Feedback::notice(Notice::success("Post published successfully!"))
            .then(self.capabilities.published_route()))
    }

    fn begin_submit(&self) -> Result<(PostWriteRequest, Credential), ViewError> {
        let mut form = self.form();
        if matches!(form.state, EditorState::Saving | EditorState::Loading) {
            return Err(ViewError::Busy);
        }
        validate_draft(&form.title, &form.content)?;
        let credential = self.session.get().ok_or(ViewError::AuthRequired)?;
        form.state = EditorState::Saving;
        Ok((
            PostWriteRequest {
                title: form.title.trim().to_string(),
                content: form.content.clone(),
            },
            credential,
        ))
    }

    /// Create or update; returns the post id and whether it was newly created.
    async fn persist(
        &self,
        request: &PostWriteRequest,
        credential: &Credential,
    ) -> Result<(PostId, bool), ViewError> {
        let mode = self.form().mode.clone();
        match mode {
            EditorMode::Create => {
                let post = self.posts.create_post(request, credential).await?;
                self.form().mode = EditorMode::Edit(post.id.clone());
                Ok((post.id, true))
            }
            EditorMode::Edit(id) => {
                self.posts.update_post(&id, request, credential).await?;
                Ok((id, false))
            }
        }
    }
}
