//! Telephony provider: outbound SMS and voice calls.
//!
//! The gateway talks to the provider through the [`Telephony`] trait so handlers can be
//! exercised without network access. [`ElksClient`] is the 46elks implementation.

mod elks;

pub use elks::ElksClient;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

/// Outbound call: play an audio file, then notify `hangup_url` when the call ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: String,
    pub play_url: Url,
    pub hangup_url: Url,
}

/// Successful provider reply (2xx).
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider api error: {status} {body}")]
    Api { status: StatusCode, body: String },
    #[error("invalid provider url: {0}")]
    Url(String),
}

#[async_trait]
pub trait Telephony: Send + Sync {
    /// Send an SMS from the provisioned number.
    async fn send_sms(&self, to: &str, text: &str) -> Result<ProviderResponse, ProviderError>;

    /// Place a voice call from the provisioned number.
    async fn place_call(&self, call: &CallRequest) -> Result<ProviderResponse, ProviderError>;
}
