//! HTTP transport: one JSON POST per question, bounded by a timeout.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::NetworkError;
use crate::messages::RawResponse;

/// Response body: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn decode(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        }
    }

    pub fn into_raw(self) -> RawResponse {
        match self {
            Body::Json(value) => RawResponse::from_json(value),
            Body::Text(text) => RawResponse::Text(text),
        }
    }
}

/// Status and decoded body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Body,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends questions to the webhook. Never retries.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST `payload` as JSON to `url`. If the status line and body have not
    /// both arrived within `timeout`, the request is dropped and reported as
    /// [`NetworkError::Timeout`].
    pub async fn send<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
        timeout: Duration,
    ) -> Result<HttpReply, NetworkError> {
        tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "sending question");
        let request = async {
            let response = self.client.post(url).json(payload).send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, NetworkError>(HttpReply {
                status,
                body: Body::decode(text),
            })
        };
        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout(timeout.as_millis() as u64)),
        }
    }
}
