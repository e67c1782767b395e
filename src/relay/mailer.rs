// relay/mailer.rs - Outbound email providers

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const OTP_SUBJECT: &str = "Your OTP Code - Expense Tracker";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    /// The verification email: greets `name` and shows `otp`
    pub fn otp(from: &str, email: &str, name: &str, otp: &str) -> Self {
        Self {
            from: from.to_string(),
            to: vec![email.to_string()],
            subject: OTP_SUBJECT.to_string(),
            html: render_otp_html(name, otp),
            text: format!(
                "Welcome {}! Your verification code is {}. This code will expire in 10 minutes.",
                name, otp
            ),
        }
    }
}

fn render_otp_html(name: &str, otp: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; margin: 0; }}
      .container {{ background-color: white; padding: 40px; border-radius: 12px; max-width: 500px; margin: 0 auto; }}
      .header {{ text-align: center; margin-bottom: 30px; }}
      .header h1 {{ color: #2563eb; margin: 0 0 10px 0; font-size: 24px; }}
      .otp-code {{ font-size: 36px; font-weight: bold; text-align: center; letter-spacing: 10px; padding: 25px; border-radius: 10px; margin: 25px 0; border: 2px dashed #2563eb; }}
      .info {{ text-align: center; color: #666; font-size: 14px; margin: 15px 0; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>Welcome {name}!</h1>
        <p>Your verification code is ready</p>
      </div>
      <div class="otp-code">{otp}</div>
      <p class="info">This code will expire in 10 minutes.</p>
      <p class="info">If you didn't request this code, please ignore this email.</p>
    </div>
  </body>
</html>"#,
        name = escape_html(name),
        otp = escape_html(otp),
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sends an email and returns the provider's response payload
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, MailerError>;
}

/// Resend HTTP API
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl ResendMailer {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, MailerError> {
        debug!(to = ?email.to, "Sending email via Resend");
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Logs messages instead of sending them; used when no API key is configured
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, MailerError> {
        info!(to = ?email.to, subject = %email.subject, body = %email.text, "Email not sent (log mailer)");
        Ok(json!({ "id": format!("log-{}", uuid::Uuid::new_v4()) }))
    }
}
