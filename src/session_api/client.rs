use super::endpoints::SessionEndpoints;
use crate::error::PreloadError;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Fixed per-request timeout for session downloads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("session-preload/", env!("CARGO_PKG_VERSION"));

/// Source of remote session payloads.
#[async_trait]
pub trait SessionFetcher: Send + Sync {
    /// Fetch the payload for `short_id` from the generator at `base_url`.
    ///
    /// `Ok(None)` when the server responded without usable data,
    /// `Err(PreloadError::SessionNotFound)` on 404.
    async fn fetch(&self, base_url: &str, short_id: &str) -> Result<Option<Value>, PreloadError>;
}

/// reqwest-backed client for the session generator.
#[derive(Clone)]
pub struct SessionApiClient {
    http: reqwest::Client,
}

impl SessionApiClient {
    pub fn new(proxy: Option<&Url>) -> Result<Self, PreloadError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(FETCH_TIMEOUT);
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SessionFetcher for SessionApiClient {
    async fn fetch(&self, base_url: &str, short_id: &str) -> Result<Option<Value>, PreloadError> {
        let url = SessionEndpoints::session_url(base_url, short_id)?;
        SessionEndpoints::fetch_session(&self.http, url).await
    }
}
