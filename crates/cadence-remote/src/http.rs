//! reqwest-backed [`RemoteActionClient`].

use std::time::Duration;

use async_trait::async_trait;
use cadence_core::config::RemoteConfig;
use cadence_core::error::RemoteError;
use cadence_core::traits::RemoteActionClient;
use cadence_core::types::{ActionOutcome, SubTarget};
use serde::Deserialize;

/// Listing response body.
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: Option<Vec<SubTarget>>,
}

/// HTTP client with a fixed per-request timeout.
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpRemoteClient {
    pub fn new(config: &RemoteConfig, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to build HTTP client: {e}")))?;
        let trimmed = config.base_url.trim_end_matches('/');
        let base = reqwest::Url::parse(trimmed)
            .map_err(|e| RemoteError::Transport(format!("Invalid base URL {trimmed}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Transport(format!("Base URL cannot carry a path: {trimmed}")));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so `/`, `?` and `#` inside an id stay within that segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport(format!("Base URL cannot carry a path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    fn listing_url(&self) -> Result<reqwest::Url, RemoteError> {
        self.endpoint(&["subtargets"])
    }

    fn action_url(&self, target_id: &str) -> Result<reqwest::Url, RemoteError> {
        if matches!(target_id, "" | "." | "..") {
            return Err(RemoteError::Transport(format!("Invalid target id: {target_id:?}")));
        }
        self.endpoint(&["targets", target_id, "actions"])
    }
}

/// Decode a listing body. A body without `data` means no sub-targets.
pub fn parse_listing(body: &str) -> Result<Vec<SubTarget>, RemoteError> {
    let parsed: ListingResponse =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(format!("Invalid listing response: {e}")))?;
    Ok(parsed.data.unwrap_or_default())
}

#[async_trait]
impl RemoteActionClient for HttpRemoteClient {
    async fn list_sub_targets(&self, credential: &str) -> Result<Vec<SubTarget>, RemoteError> {
        let response = self
            .client
            .get(self.listing_url()?)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("Listing request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to read listing body: {e}")))?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let targets = parse_listing(&body)?;
        tracing::debug!("📋 Listed {} sub-target(s)", targets.len());
        Ok(targets)
    }

    async fn perform_action(&self, sub_credential: &str, target_id: &str, message: &str) -> ActionOutcome {
        let url = self.action_url(target_id).map_err(|e| e.to_string())?;
        let response = self
            .client
            .post(url)
            .bearer_auth(sub_credential)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .map_err(|e| format!("Action request failed: {e}"))?;

        if response.status() == reqwest::StatusCode::OK {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if body.is_empty() {
            Err(format!("HTTP {status}"))
        } else {
            Err(body)
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
