#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use expense_tracker::auth::{CodeDelivery, DeliveryReport, OtpCode};
use expense_tracker::relay::{self, Mailer, MailerError, OutgoingEmail, RelayState};
use expense_tracker::AppContext;

/// Context over a fresh directory store; keep the TempDir alive for the test
pub fn temp_context() -> Result<(TempDir, AppContext)> {
    let dir = tempfile::tempdir()?;
    let ctx = AppContext::open_dir(dir.path())?;
    Ok((dir, ctx))
}

/// Captures every code it is asked to send
#[derive(Default)]
pub struct RecordingDelivery {
    pub fail_with: Option<String>,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingDelivery {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().ok()?.last().map(|(_, code, _)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CodeDelivery for RecordingDelivery {
    async fn send(&self, email: &str, code: &OtpCode, name: &str) -> DeliveryReport {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((email.to_string(), code.as_str().to_string(), name.to_string()));
        }
        match &self.fail_with {
            Some(message) => DeliveryReport::failed(message.clone()),
            None => DeliveryReport::sent("OTP sent successfully"),
        }
    }
}

/// Mailer double for the relay
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, MailerError> {
        if self.fail {
            return Err(MailerError::Rejected {
                status: 422,
                body: "domain not verified".to_string(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(json!({ "id": "test-email-id" }))
    }
}

pub struct TestRelay {
    pub port: u16,
    pub base_url: String,
}

impl TestRelay {
    pub fn send_otp_url(&self) -> String {
        format!("{}/api/send-otp", self.base_url)
    }
}

/// Serve the relay router on a free local port for the rest of the test
pub async fn spawn_relay(mailer: Arc<dyn Mailer>) -> Result<TestRelay> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = relay::app(RelayState::new(mailer, "Expense Tracker <onboarding@resend.dev>"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestRelay {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    })
}
