//! reqwest-backed frame proxy client

use super::types::{FrameActionBody, FrameActionResponse, RedirectEnvelope, RedirectResponse};
use super::{FrameError, FrameService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Posts frame actions to a proxy that forwards them to the frame server.
///
/// `{base}/action` answers with the next frame, `{base}/redirect` with a
/// `{response: {status, location}}` envelope.
pub struct HttpFrameService {
    client: Client,
    action_url: String,
    redirect_url: String,
}

impl HttpFrameService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FrameError> {
        let base = base_url.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FrameError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            action_url: format!("{base}/action"),
            redirect_url: format!("{base}/redirect"),
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &FrameActionBody,
    ) -> Result<T, FrameError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FrameError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    FrameError::network(format!("Connection failed: {e}"))
                } else {
                    FrameError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FrameError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| FrameError::malformed(format!("Failed to parse response: {e}")))
    }
}

fn classify_error(status: StatusCode, body: &str) -> FrameError {
    match status.as_u16() {
        400..=499 => FrameError::invalid_request(format!("Rejected ({status}): {body}")),
        500..=599 => FrameError::server_error(format!("Server error ({status}): {body}")),
        _ => FrameError::unknown(format!("HTTP {status}: {body}")),
    }
}

#[async_trait]
impl FrameService for HttpFrameService {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        self.post_json(&self.action_url, body).await
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        let envelope: RedirectEnvelope = self.post_json(&self.redirect_url, body).await?;
        Ok(envelope.response)
    }

    fn endpoint(&self) -> &str {
        &self.action_url
    }
}
