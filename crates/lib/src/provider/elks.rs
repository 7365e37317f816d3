//! 46elks REST client: POST /sms and POST /calls with basic auth and form bodies.

use crate::config::Settings;
use crate::provider::{CallRequest, ProviderError, ProviderResponse, Telephony};
use async_trait::async_trait;
use reqwest::Url;

#[derive(Clone)]
pub struct ElksClient {
    api_base: Url,
    username: String,
    password: String,
    number: String,
    client: reqwest::Client,
}

impl ElksClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            api_base: settings.api_base.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            number: settings.number.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// POST a form to `<api_base>/<endpoint>`. Non-2xx replies are returned as [`ProviderError::Api`].
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<ProviderResponse, ProviderError> {
        let url = self
            .api_base
            .join(endpoint)
            .map_err(|e| ProviderError::Url(e.to_string()))?;
        let res = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .form(form)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ProviderError::Api { status, body });
        }
        Ok(ProviderResponse { status, body })
    }
}

#[async_trait]
impl Telephony for ElksClient {
    async fn send_sms(&self, to: &str, text: &str) -> Result<ProviderResponse, ProviderError> {
        log::debug!("46elks: sending sms to {}", to);
        self.post_form(
            "sms",
            &[("from", self.number.as_str()), ("to", to), ("message", text)],
        )
        .await
    }

    async fn place_call(&self, call: &CallRequest) -> Result<ProviderResponse, ProviderError> {
        log::debug!("46elks: calling {} with {}", call.to, call.play_url);
        let voice_start = serde_json::json!({ "play": call.play_url.as_str() }).to_string();
        self.post_form(
            "calls",
            &[
                ("from", self.number.as_str()),
                ("to", call.to.as_str()),
                ("voice_start", voice_start.as_str()),
                ("whenhangup", call.hangup_url.as_str()),
            ],
        )
        .await
    }
}
