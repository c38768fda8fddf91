//! How the chat client reaches the service.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::message::{ChatRequest, ChatResponse, ResponseStatus};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(StatusCode),

    #[error("service reported an unsuccessful reply")]
    Unsuccessful,
}

/// One chat exchange with the service.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ClientError>> + Send;
}

/// Talks to a running service over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    chat_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let resp = self.http.post(&self.chat_url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body: ChatResponse = resp.json().await?;
        debug!(url = %self.chat_url, "chat reply received");
        match body.status {
            ResponseStatus::Success => Ok(body),
            ResponseStatus::Error => Err(ClientError::Unsuccessful),
        }
    }
}
