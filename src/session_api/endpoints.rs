use crate::error::PreloadError;
use crate::types::SessionEnvelope;

use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::debug;

/// Stateless session generator endpoints.
pub(super) struct SessionEndpoints;

impl SessionEndpoints {
    /// `{base}/api/session/{short_id}`, with one trailing slash trimmed from `base`.
    pub(super) fn session_url(base_url: &str, short_id: &str) -> Result<Url, PreloadError> {
        let base = base_url.strip_suffix('/').unwrap_or(base_url);
        Ok(Url::parse(&format!("{base}/api/session/{short_id}"))?)
    }

    /// Download one session payload.
    ///
    /// `Ok(None)` means the server answered but carried no usable `data`.
    pub(super) async fn fetch_session(
        http_client: &reqwest::Client,
        url: Url,
    ) -> Result<Option<Value>, PreloadError> {
        let resp = http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PreloadError::SessionNotFound);
        }
        if !status.is_success() {
            return Err(PreloadError::UpstreamStatus(status));
        }

        let body = resp.bytes().await?;
        debug!(status = %status, bytes = body.len(), "session generator responded");
        Ok(SessionEnvelope::from_body(&body).into_payload()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_url_trims_one_trailing_slash() {
        let url = SessionEndpoints::session_url("https://gen.example/", "abc").unwrap();
        assert_eq!(url.as_str(), "https://gen.example/api/session/abc");

        let url = SessionEndpoints::session_url("https://gen.example/base", "abc").unwrap();
        assert_eq!(url.as_str(), "https://gen.example/base/api/session/abc");
    }

    #[test]
    fn session_url_rejects_garbage_base() {
        assert!(matches!(
            SessionEndpoints::session_url("not a url", "abc"),
            Err(PreloadError::UrlParse(_))
        ));
    }
}
