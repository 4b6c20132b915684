use super::{FetchError, SearchFetcher, SearchItem};
use crate::config::SearchConfig;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Fetches posts from a JSONPlaceholder-style `GET /posts?q=` endpoint.
pub struct HttpSearchFetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchFetcher {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn from_config(config: &SearchConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ref agent) = config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        Self::with_client(builder.build()?, &config.base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let endpoint = posts_endpoint(base_url)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchItem>, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("Accept", "application/json")
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchFetcher for HttpSearchFetcher {
    async fn fetch(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchItem>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        debug!(url = %self.endpoint, query, "fetching posts");

        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            res = self.request(query) => res,
        }
    }
}

/// Resolve `{base}/posts`, tolerating a trailing slash on the base.
fn posts_endpoint(base_url: &str) -> anyhow::Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("posts")?)
}
