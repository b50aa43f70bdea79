//! In-memory stand-in for the remote post and auth services.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use blogdesk_api_types::{
    CurrentUser, Page, Post, PostAuthor, PostId, PostPage, PostWriteRequest, Role,
};
use tokio::sync::oneshot;

use crate::application::repos::{AuthRepo, PageQuery, PostsRepo, RepoError};
use crate::application::session::Credential;
use crate::domain::posts::Partition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(Partition, PageQuery),
    Count(Partition),
    Get(PostId),
    Create(String),
    Update(PostId),
    Publish(PostId),
    Delete(PostId),
    Me,
    Users,
}

#[derive(Default)]
struct FakeState {
    drafts: Vec<Post>,
    published: Vec<Post>,
    next_id: i64,
    calls: Vec<Call>,
    failing_publish: HashSet<PostId>,
    list_error: Option<RepoError>,
    get_error: Option<RepoError>,
    create_error: Option<RepoError>,
    update_error: Option<RepoError>,
    delete_error: Option<RepoError>,
    user: Option<CurrentUser>,
    me_error: Option<RepoError>,
    users_error: Option<RepoError>,
    user_count: u64,
    list_gates: VecDeque<oneshot::Receiver<()>>,
    publish_gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub(crate) struct FakeBlog {
    state: Mutex<FakeState>,
}

pub(crate) fn sample_post(id: i64, title: &str) -> Post {
    Post {
        id: PostId::Number(id),
        title: title.to_string(),
        content: format!("<p>{title} body</p>"),
        author: PostAuthor {
            id: PostId::Number(1),
            username: "ana".into(),
            email: "ana@example.com".into(),
            role: None,
        },
        created_at: "2024-05-01T10:00:00".into(),
        updated_at: "2024-05-02T11:30:00".into(),
    }
}

pub(crate) fn credential() -> Credential {
    Credential::new("test-token")
}

impl FakeBlog {
    pub(crate) fn with_posts(drafts: usize, published: usize) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.lock();
            for _ in 0..drafts {
                state.next_id += 1;
                let id = state.next_id;
                state.drafts.push(sample_post(id, &format!("Draft {id}")));
            }
            for _ in 0..published {
                state.next_id += 1;
                let id = state.next_id;
                state.published.push(sample_post(id, &format!("Post {id}")));
            }
        }
        fake
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn draft_ids(&self) -> Vec<PostId> {
        self.lock().drafts.iter().map(|p| p.id.clone()).collect()
    }

    pub(crate) fn published_ids(&self) -> Vec<PostId> {
        self.lock().published.iter().map(|p| p.id.clone()).collect()
    }

    pub(crate) fn fail_publish_of(&self, id: PostId) {
        self.lock().failing_publish.insert(id);
    }

    pub(crate) fn fail_list(&self, err: RepoError) {
        self.lock().list_error = Some(err);
    }

    pub(crate) fn heal_list(&self) {
        self.lock().list_error = None;
    }

    pub(crate) fn fail_get(&self, err: RepoError) {
        self.lock().get_error = Some(err);
    }

    pub(crate) fn fail_create(&self, err: RepoError) {
        self.lock().create_error = Some(err);
    }

    pub(crate) fn fail_update(&self, err: RepoError) {
        self.lock().update_error = Some(err);
    }

    pub(crate) fn fail_delete(&self, err: RepoError) {
        self.lock().delete_error = Some(err);
    }

    pub(crate) fn sign_in_as(&self, role: Role) {
        self.lock().user = Some(CurrentUser {
            id: PostId::Number(1),
            username: "ana".into(),
            email: "ana@example.com".into(),
            role,
        });
    }

    pub(crate) fn fail_me(&self, err: RepoError) {
        self.lock().me_error = Some(err);
    }

    pub(crate) fn set_user_count(&self, count: u64) {
        self.lock().user_count = count;
    }

    pub(crate) fn fail_users(&self, err: RepoError) {
        self.lock().users_error = Some(err);
    }

    /// Hold the next listing response until the returned sender fires.
    pub(crate) fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().list_gates.push_back(rx);
        tx
    }

    /// Hold the next publish response until the returned sender fires.
    pub(crate) fn gate_next_publish(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().publish_gate = Some(rx);
        tx
    }

    fn partition_posts(state: &FakeState, partition: Partition) -> Vec<Post> {
        match partition {
            Partition::Published => state.published.clone(),
            Partition::Drafts | Partition::AllDrafts => state.drafts.clone(),
            Partition::Mine => state
                .drafts
                .iter()
                .chain(state.published.iter())
                .cloned()
                .collect(),
        }
    }
}

fn paginate(posts: Vec<Post>, query: PageQuery) -> PostPage {
    let size = query.size.max(1);
    let total_elements = posts.len() as u64;
    let total_pages = u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
    let content = posts
        .into_iter()
        .skip((query.page * size) as usize)
        .take(size as usize)
        .collect();
    Page {
        content,
        total_pages,
        total_elements,
        size,
        number: query.page,
        first: query.page == 0,
        last: total_pages == 0 || query.page + 1 >= total_pages,
    }
}

#[async_trait]
impl PostsRepo for FakeBlog {
    async fn list_posts(
        &self,
        partition: Partition,
        query: PageQuery,
        credential: Option<&Credential>,
    ) -> Result<PostPage, RepoError> {
        let (result, gate) = {
            let mut state = self.lock();
            state.calls.push(Call::List(partition, query));
            let gate = state.list_gates.pop_front();
            let result = if let Some(err) = state.list_error.clone() {
                Err(err)
            } else if partition.requires_credential() && credential.is_none() {
                Err(RepoError::status(401, "missing token"))
            } else {
                Ok(paginate(Self::partition_posts(&state, partition), query))
            };
            (result, gate)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn count_posts(
        &self,
        partition: Partition,
        _credential: Option<&Credential>,
    ) -> Result<u64, RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Count(partition));
        if let Some(err) = state.list_error.clone() {
            return Err(err);
        }
        Ok(Self::partition_posts(&state, partition).len() as u64)
    }

    async fn get_post(
        &self,
        id: &PostId,
        _credential: Option<&Credential>,
    ) -> Result<Post, RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Get(id.clone()));
        if let Some(err) = state.get_error.clone() {
            return Err(err);
        }
        state
            .drafts
            .iter()
            .chain(state.published.iter())
            .find(|post| &post.id == id)
            .cloned()
            .ok_or_else(|| RepoError::status(404, "Post not found"))
    }

    async fn create_post(
        &self,
        request: &PostWriteRequest,
        _credential: &Credential,
    ) -> Result<Post, RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Create(request.title.clone()));
        if let Some(err) = state.create_error.clone() {
            return Err(err);
        }
        state.next_id += 1;
        let mut post = sample_post(state.next_id, &request.title);
        post.content = request.content.clone();
        state.drafts.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: &PostId,
        request: &PostWriteRequest,
        _credential: &Credential,
    ) -> Result<(), RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Update(id.clone()));
        if let Some(err) = state.update_error.clone() {
            return Err(err);
        }
        let post = state
            .drafts
            .iter_mut()
            .find(|post| &post.id == id)
            .ok_or_else(|| RepoError::status(404, "Post not found"))?;
        post.title = request.title.clone();
        post.content = request.content.clone();
        Ok(())
    }

    async fn publish_post(&self, id: &PostId, _credential: &Credential) -> Result<(), RepoError> {
        let (result, gate) = {
            let mut state = self.lock();
            state.calls.push(Call::Publish(id.clone()));
            let gate = state.publish_gate.take();
            let result = if state.failing_publish.contains(id) {
                Err(RepoError::status(500, "publish failed"))
            } else if let Some(index) = state.drafts.iter().position(|post| &post.id == id) {
                let post = state.drafts.remove(index);
                state.published.push(post);
                Ok(())
            } else {
                Err(RepoError::status(404, "Post not found"))
            };
            (result, gate)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn delete_post(&self, id: &PostId, _credential: &Credential) -> Result<(), RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Delete(id.clone()));
        if let Some(err) = state.delete_error.clone() {
            return Err(err);
        }
        let before = state.drafts.len() + state.published.len();
        state.drafts.retain(|post| &post.id != id);
        state.published.retain(|post| &post.id != id);
        if state.drafts.len() + state.published.len() == before {
            return Err(RepoError::status(404, "Post not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthRepo for FakeBlog {
    async fn current_user(&self, _credential: &Credential) -> Result<CurrentUser, RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Me);
        if let Some(err) = state.me_error.clone() {
            return Err(err);
        }
        state
            .user
            .clone()
            .ok_or_else(|| RepoError::status(401, "invalid token"))
    }

    async fn count_users(&self, _credential: &Credential) -> Result<u64, RepoError> {
        let mut state = self.lock();
        state.calls.push(Call::Users);
        if let Some(err) = state.users_error.clone() {
            return Err(err);
        }
        Ok(state.user_count)
    }
}
