//! HTTP implementation of the contents API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::models::{ContentsResponse, ErrorBody};
use super::{
    ApiError, ContentItem, DeleteContentRequest, PutContentRequest, PutContentResponse,
    RepoTarget, User,
};

/// Client identifier sent with every request; the API rejects anonymous agents.
pub const CLIENT_USER_AGENT: &str = concat!("mdocs/", env!("CARGO_PKG_VERSION"));

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

pub type Result<T> = std::result::Result<T, ApiError>;

/// Typed access to repository contents.
///
/// Implementations make exactly one attempt per call. A 404 is reported as
/// [`ApiError::NotFound`]; deciding whether that means "empty" is up to the
/// caller.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// `GET /user`
    async fn current_user(&self) -> Result<User>;

    /// `GET contents/{dir}` for a directory
    async fn list_directory(&self, target: &RepoTarget, dir: &str) -> Result<Vec<ContentItem>>;

    /// `GET contents/{path}` for a single file, including its encoded body
    async fn get_file(&self, target: &RepoTarget, path: &str) -> Result<ContentItem>;

    /// `PUT contents/{path}` to create or update a file
    async fn put_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<PutContentResponse>;

    /// `DELETE contents/{path}`
    async fn delete_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &DeleteContentRequest,
    ) -> Result<()>;
}

/// Hands out API handles bound to a credential.
pub trait ApiProvider: Send + Sync {
    fn connect(&self, token: &str) -> Arc<dyn ContentsApi>;
}

/// reqwest-backed [`ContentsApi`].
#[derive(Clone)]
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing reqwest connection pool.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: Some(token.into()),
            client: self.client.clone(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Network(format!("invalid API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network("API base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contents_url(&self, target: &RepoTarget, path: &str) -> Result<Url> {
        let mut segments = vec!["repos", target.owner.as_str(), target.name.as_str(), "contents"];
        let path = path.trim_matches('/');
        if path.is_empty() {
            segments.push("");
        } else {
            segments.extend(path.split('/'));
        }
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, ACCEPT_JSON)
            .header(API_VERSION_HEADER, API_VERSION);

        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        let err = ApiError::from_status(status, message);
        tracing::debug!(status = status.as_u16(), error = %err, "GitHub API request failed");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ContentsApi for GitHubClient {
    async fn current_user(&self) -> Result<User> {
        let url = self.url(&["user"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn list_directory(&self, target: &RepoTarget, dir: &str) -> Result<Vec<ContentItem>> {
        let mut url = self.contents_url(target, dir)?;
        url.query_pairs_mut().append_pair("ref", &target.branch);
        tracing::debug!(%url, "Listing directory");

        let response: ContentsResponse = self.send_json(self.request(Method::GET, url)).await?;
        Ok(response.into_items())
    }

    async fn get_file(&self, target: &RepoTarget, path: &str) -> Result<ContentItem> {
        let mut url = self.contents_url(target, path)?;
        url.query_pairs_mut().append_pair("ref", &target.branch);

        match self.send_json(self.request(Method::GET, url)).await? {
            ContentsResponse::File(item) => Ok(*item),
            ContentsResponse::Directory(_) => Err(ApiError::Decode(format!(
                "{path} is a directory, not a file"
            ))),
        }
    }

    async fn put_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<PutContentResponse> {
        let url = self.contents_url(target, path)?;
        tracing::debug!(%url, update = request.sha.is_some(), "Writing file");
        self.send_json(self.request(Method::PUT, url).json(request))
            .await
    }

    async fn delete_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &DeleteContentRequest,
    ) -> Result<()> {
        let url = self.contents_url(target, path)?;
        tracing::debug!(%url, "Deleting file");
        self.send(self.request(Method::DELETE, url).json(request))
            .await?;
        Ok(())
    }
}

impl ApiProvider for GitHubClient {
    fn connect(&self, token: &str) -> Arc<dyn ContentsApi> {
        Arc::new(self.with_token(token))
    }
}
