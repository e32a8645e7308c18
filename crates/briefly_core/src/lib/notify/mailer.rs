use reqwest::Client;
use serde_json::json;

use crate::{
    notify::{Email, EmailSender},
    Error,
};

/// HTTP client for the transactional mail provider.
#[derive(Debug, Clone)]
pub struct MailerClient {
    client: Client,
    api_key: String,
    from_address: String,
    base_url: String,
}

impl MailerClient {
    const BASE_URL: &'static str = "https://api.resend.com";

    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            from_address: from_address.into(),
            base_url: Self::BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl EmailSender for MailerClient {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        let body = json!({
            "from": self.from_address,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
            "text": email.text,
        });

        let resp = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend { status, message });
        }

        Ok(())
    }
}
