//! Single-shot webhook delivery: one POST per reminder, no retries.

use herald_core::NotificationMessage;
use reqwest::header::{HeaderValue, CONTENT_TYPE};

use crate::error::{DispatchError, Result};
use crate::payload::encode;

/// Longest slice of a rejection body kept in the error message.
const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub endpoint_url: String,
}

impl DeliveryTarget {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
        }
    }
}

/// What to do when the endpoint answers with a non-2xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Non-2xx is a [`DispatchError::Delivery`].
    #[default]
    Strict,
    /// Any response counts as delivered; the status is only logged.
    Lenient,
}

pub struct Dispatcher {
    client: reqwest::Client,
    status_policy: StatusPolicy,
}

impl Dispatcher {
    pub fn new(status_policy: StatusPolicy) -> Self {
        Self::with_client(reqwest::Client::new(), status_policy)
    }

    pub fn with_client(client: reqwest::Client, status_policy: StatusPolicy) -> Self {
        Self {
            client,
            status_policy,
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Encode `message` and POST it to `target`.
    pub async fn send(&self, target: &DeliveryTarget, message: &NotificationMessage) -> Result<()> {
        let body = encode(message)?;
        self.send_encoded(target, body).await
    }

    /// POST an already encoded body. Dry-run output and real sends share this body.
    pub async fn send_encoded(&self, target: &DeliveryTarget, body: String) -> Result<()> {
        let request = self
            .client
            .post(target.endpoint_url.as_str())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .build()
            .map_err(|e| DispatchError::request_build(describe(e)))?;

        // the webhook path embeds its token; only the host goes to the log
        let host = request.url().host_str().unwrap_or_default().to_string();
        tracing::debug!(%host, "posting reminder to webhook");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| DispatchError::delivery(describe(e)))?;

        let status = response.status();
        tracing::info!(%host, status = status.as_u16(), "webhook responded");

        if status.is_success() {
            return Ok(());
        }

        match self.status_policy {
            StatusPolicy::Lenient => {
                tracing::warn!(status = status.as_u16(), "webhook returned non-success status; ignoring");
                Ok(())
            }
            StatusPolicy::Strict => {
                let text = response.text().await.unwrap_or_default();
                Err(DispatchError::delivery(format!(
                    "webhook rejected the message: {status} {}",
                    excerpt(&text)
                )))
            }
        }
    }
}

/// Error text with its cause chain, minus the URL.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut out = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
    out.push('…');
    out
}
