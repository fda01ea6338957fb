//! HTTP chat backend
//!
//! Posts `{prompt, history}` as JSON to the configured endpoint and reads
//! `{response}` back. No retries; the request has no timeout unless one is
//! configured.

use crate::backend::{ChatBackend, ChatReply, ChatRequest};
use crate::config::EndpointConfig;
use crate::error::{NovaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Chat endpoint reached over HTTP
///
/// # Examples
///
/// ```no_run
/// use nova_scribe::backend::{ChatBackend, ChatRequest, HttpChatBackend};
/// use nova_scribe::config::EndpointConfig;
///
/// # async fn example() -> nova_scribe::error::Result<()> {
/// let backend = HttpChatBackend::new(&EndpointConfig::default())?;
/// let reply = backend.reply(&ChatRequest::new("Hello", vec![])).await?;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct HttpChatBackend {
    client: Client,
    url: String,
}

impl HttpChatBackend {
    /// Create a backend for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Backend` if the HTTP client cannot be built
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| NovaError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized chat backend: url={}", config.url);

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Endpoint URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn reply(&self, request: &ChatRequest) -> Result<String> {
        tracing::debug!(
            "Sending chat request: {} history turns, prompt {} chars",
            request.history.len(),
            request.prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| NovaError::Backend(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NovaError::Backend(format!(
                "Chat endpoint returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| NovaError::Backend(format!("Failed to parse chat response: {}", e)))?;

        tracing::debug!("Chat reply: {} chars", reply.response.chars().count());

        Ok(reply.response)
    }
}
