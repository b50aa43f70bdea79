//! `reqwest` adapter for the blog REST API.

use async_trait::async_trait;
use blogdesk_api_types::{
    CurrentUser, ErrorBody, PageTotals, Post, PostId, PostPage, PostWriteRequest,
};
use reqwest::{Client, Method, RequestBuilder, Response, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::application::repos::{AuthRepo, PageQuery, PostsRepo, RepoError};
use crate::application::session::Credential;
use crate::config::ApiSettings;
use crate::domain::posts::Partition;

use super::error::InfraError;

const USERS_PATH: &str = "api/auth/users";
const ME_PATH: &str = "api/auth/me";
const POSTS_PATH: &str = "api/posts";

#[derive(Clone, Debug)]
pub struct HttpBlogApi {
    client: Client,
    base: Url,
}

impl HttpBlogApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self {
            client,
            base: settings.base_url.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("blogdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, RepoError> {
        self.base
            .join(path)
            .map_err(|err| RepoError::transport(format!("invalid request path `{path}`: {err}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, u32)],
        credential: Option<&Credential>,
    ) -> Result<RequestBuilder, RepoError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, &value.to_string());
            }
        }
        debug!(%method, %url, "api request");
        let mut req = self.client.request(method, url);
        if let Some(credential) = credential {
            req = req.header(AUTHORIZATION, credential.bearer());
        }
        Ok(req)
    }

    async fn send(req: RequestBuilder) -> Result<Response, RepoError> {
        let resp = req.send().await.map_err(RepoError::transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(RepoError::status(status.as_u16(), error_message(&text)))
    }

    async fn fetch<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, RepoError> {
        let bytes = Self::send(req)
            .await?
            .bytes()
            .await
            .map_err(RepoError::transport)?;
        serde_json::from_slice(&bytes).map_err(|err| RepoError::Decode(err.to_string()))
    }

    async fn execute(req: RequestBuilder) -> Result<(), RepoError> {
        Self::send(req).await.map(|_| ())
    }
}

/// Service-provided `message`, or empty when the body carries none.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .map(|message| message.trim().to_string())
        .unwrap_or_default()
}

fn paging(query: PageQuery) -> [(&'static str, u32); 2] {
    [("page", query.page), ("size", query.size)]
}

fn post_path(id: &PostId) -> String {
    format!("{POSTS_PATH}/{id}")
}

#[async_trait]
impl PostsRepo for HttpBlogApi {
    async fn list_posts(
        &self,
        partition: Partition,
        query: PageQuery,
        credential: Option<&Credential>,
    ) -> Result<PostPage, RepoError> {
        let req = self.request(Method::GET, partition.path(), &paging(query), credential)?;
        Self::fetch(req).await
    }

    async fn count_posts(
        &self,
        partition: Partition,
        credential: Option<&Credential>,
    ) -> Result<u64, RepoError> {
        let req = self.request(
            Method::GET,
            partition.path(),
            &paging(PageQuery::new(0, 1)),
            credential,
        )?;
        let totals: PageTotals = Self::fetch(req).await?;
        Ok(totals.total_elements)
    }

    async fn get_post(
        &self,
        id: &PostId,
        credential: Option<&Credential>,
    ) -> Result<Post, RepoError> {
        let req = self.request(Method::GET, &post_path(id), &[], credential)?;
        Self::fetch(req).await
    }

    async fn create_post(
        &self,
        request: &PostWriteRequest,
        credential: &Credential,
    ) -> Result<Post, RepoError> {
        let req = self
            .request(Method::POST, POSTS_PATH, &[], Some(credential))?
            .json(request);
        Self::fetch(req).await
    }

    async fn update_post(
        &self,
        id: &PostId,
        request: &PostWriteRequest,
        credential: &Credential,
    ) -> Result<(), RepoError> {
        let req = self
            .request(Method::PUT, &post_path(id), &[], Some(credential))?
            .json(request);
        Self::execute(req).await
    }

    async fn publish_post(&self, id: &PostId, credential: &Credential) -> Result<(), RepoError> {
        let path = format!("{}/published", post_path(id));
        let req = self.request(Method::PUT, &path, &[], Some(credential))?;
        Self::execute(req).await
    }

    async fn delete_post(&self, id: &PostId, credential: &Credential) -> Result<(), RepoError> {
        let req = self.request(Method::DELETE, &post_path(id), &[], Some(credential))?;
        Self::execute(req).await
    }
}

#[async_trait]
impl AuthRepo for HttpBlogApi {
    async fn current_user(&self, credential: &Credential) -> Result<CurrentUser, RepoError> {
        let req = self.request(Method::GET, ME_PATH, &[], Some(credential))?;
        Self::fetch(req).await
    }

    async fn count_users(&self, credential: &Credential) -> Result<u64, RepoError> {
        let req = self.request(Method::GET, USERS_PATH, &[("size", 1)], Some(credential))?;
        let totals: PageTotals = Self::fetch(req).await?;
        Ok(totals.total_elements)
    }
}
