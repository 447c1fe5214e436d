use anyhow::Context as _;
use serde::Serialize;

use crate::domain::repository::MailerPort;
use crate::error::CrumbsError;

const RESET_SUBJECT: &str = "Reset your Crumbs password";

/// Resend (`POST {base}/emails`) delivery. Without an API key, sends are
/// logged and skipped.
#[derive(Clone)]
pub struct ResendMailer {
    pub http: reqwest::Client,
    pub api_key: Option<String>,
    pub base_url: String,
    pub from: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

fn reset_html(reset_link: &str) -> String {
    format!(
        "<p>Click the link below to reset your password:</p>\
         <p><a href=\"{reset_link}\">{reset_link}</a></p>"
    )
}

impl MailerPort for ResendMailer {
    async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<(), CrumbsError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            tracing::warn!("RESEND_API_KEY not set, password reset email skipped");
            return Ok(());
        };

        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: RESET_SUBJECT,
            html: reset_html(reset_link),
        };
        self.http
            .post(format!("{}/emails", self.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("send reset email")?
            .error_for_status()
            .context("resend rejected reset email")?;
        Ok(())
    }
}
