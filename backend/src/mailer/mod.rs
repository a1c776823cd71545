//! Outbound transactional email
//!
//! Thin client for a Resend-compatible HTTP email API. The API key is
//! held as a secret and never logged; an empty key disables delivery so
//! development and test environments log messages instead of sending.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MailConfig;

/// Transactional email sender
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_base: String,
    api_key: SecretString,
    from: String,
}

/// Wire format of the send request
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl Mailer {
    pub fn new(http: reqwest::Client, config: &MailConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: SecretString::new(config.api_key.clone()),
            from: config.from.clone(),
        }
    }

    /// Whether outbound delivery is configured
    pub fn is_enabled(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Send one email
    ///
    /// Callers on non-critical paths log the error instead of
    /// propagating it; this method itself never retries.
    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if !self.is_enabled() {
            debug!(to, subject, "mail delivery disabled, skipping send");
            return Ok(());
        }

        let request = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject,
            html: html_body,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("email API returned status {}", response.status());
        }

        info!(to, subject, "email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mailer(server: &MockServer, api_key: &str) -> Mailer {
        Mailer::new(
            reqwest::Client::new(),
            &MailConfig {
                api_base: server.uri(),
                api_key: api_key.to_string(),
                from: "Stock Dashboard <onboarding@resend.dev>".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_send_posts_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test_key"))
            .and(body_partial_json(serde_json::json!({
                "to": ["alice@example.com"],
                "subject": "Password Reset",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        mailer(&server, "re_test_key")
            .send("alice@example.com", "Password Reset", "<p>hi</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = mailer(&server, "re_test_key")
            .send("alice@example.com", "subject", "body")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_disabled_mailer_skips_delivery() {
        let server = MockServer::start().await;
        // No mock mounted: a request would fail the test via connection error
        mailer(&server, "")
            .send("alice@example.com", "subject", "body")
            .await
            .unwrap();
    }
}
