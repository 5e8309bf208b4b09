use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::PostError;
use crate::models::{PostId, PostRequest, PostServiceConfig};

/// Creates posts from a finished flow
#[async_trait]
pub trait PostService: Send + Sync {
    /// Submit one post. An error leaves the flow on the caption step.
    async fn create_post(&self, request: &PostRequest) -> Result<PostId, PostError>;
}

/// Post service speaking JSON over HTTP: `POST {base_url}/posts`
pub struct HttpPostService {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    id: ResponseId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseId {
    Text(String),
    Number(u64),
}

impl HttpPostService {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth_token: Option<String>,
    ) -> Result<Self, PostError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/posts", base_url.trim_end_matches('/')),
            auth_token,
        })
    }

    pub fn from_config(config: &PostServiceConfig) -> Result<Self, PostError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or(PostError::NotConfigured)?;
        Self::new(
            base_url,
            Duration::from_secs(config.timeout_secs),
            config.auth_token.clone(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PostService for HttpPostService {
    async fn create_post(&self, request: &PostRequest) -> Result<PostId, PostError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            media_url = %request.media_url,
            tags = request.tags.len(),
            "Submitting post"
        );

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(ref token) = self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreatePostResponse = response
            .json()
            .await
            .map_err(|e| PostError::MalformedResponse(e.to_string()))?;

        match body.id {
            ResponseId::Text(id) if !id.trim().is_empty() => Ok(PostId::new(id)),
            ResponseId::Text(_) => Err(PostError::MalformedResponse("empty post id".into())),
            ResponseId::Number(n) => Ok(PostId::new(n.to_string())),
        }
    }
}

/// In-memory post storage, used for dry runs
pub struct InMemoryPostService {
    posts: Arc<RwLock<Vec<(PostId, PostRequest)>>>,
}

impl InMemoryPostService {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Everything submitted so far, oldest first
    pub async fn posts(&self) -> Vec<(PostId, PostRequest)> {
        self.posts.read().await.clone()
    }
}

impl Default for InMemoryPostService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostService for InMemoryPostService {
    async fn create_post(&self, request: &PostRequest) -> Result<PostId, PostError> {
        let mut posts = self.posts.write().await;
        let id = PostId::new(format!("local-{}", posts.len() + 1));
        posts.push((id.clone(), request.clone()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PostRequest {
        PostRequest {
            caption: "hello".to_string(),
            media_url: "m1".to_string(),
            tags: vec!["revdup".to_string()],
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service =
            HttpPostService::new("http://localhost:8080/api/", Duration::from_secs(1), None)
                .unwrap();
        assert_eq!(service.endpoint(), "http://localhost:8080/api/posts");
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = PostServiceConfig::default();
        assert!(matches!(
            HttpPostService::from_config(&config),
            Err(PostError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_in_memory_assigns_sequential_ids() {
        let service = InMemoryPostService::new();

        let first = service.create_post(&request()).await.unwrap();
        let second = service.create_post(&request()).await.unwrap();

        assert_eq!(first.as_str(), "local-1");
        assert_eq!(second.as_str(), "local-2");
        assert_eq!(service.posts().await.len(), 2);
    }
}
