// auth/delivery.rs - Dispatching verification codes to the user

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use super::otp::OtpCode;

/// Message reported when the relay cannot be reached or answers garbage
pub const CONNECTION_FAILED_MESSAGE: &str = "Failed to send OTP. Please check your connection.";

/// Outcome of a send attempt, in the relay's wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl DeliveryReport {
    pub fn sent(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Sends a verification code to an email address. Implementations report
/// failure through the report rather than an error.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn send(&self, email: &str, code: &OtpCode, name: &str) -> DeliveryReport;
}

#[derive(Serialize)]
struct SendOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
    name: &'a str,
}

/// Posts codes to the mail relay's `/api/send-otp` endpoint
#[derive(Debug, Clone)]
pub struct RelayDelivery {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl RelayDelivery {
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CodeDelivery for RelayDelivery {
    async fn send(&self, email: &str, code: &OtpCode, name: &str) -> DeliveryReport {
        let body = SendOtpRequest { email, otp: code.as_str(), name };

        let response = match self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "OTP relay unreachable");
                return DeliveryReport::failed(CONNECTION_FAILED_MESSAGE);
            }
        };

        let status = response.status();
        match response.json::<DeliveryReport>().await {
            Ok(report) => {
                if !report.success {
                    warn!(%status, message = %report.message, "OTP relay rejected send");
                }
                report
            }
            Err(e) => {
                warn!(%status, error = %e, "OTP relay returned an unreadable body");
                DeliveryReport::failed(CONNECTION_FAILED_MESSAGE)
            }
        }
    }
}

/// Development delivery: shows the code locally instead of emailing it
#[derive(Debug, Clone, Default)]
pub struct ConsoleDelivery;

#[async_trait]
impl CodeDelivery for ConsoleDelivery {
    async fn send(&self, email: &str, code: &OtpCode, name: &str) -> DeliveryReport {
        info!(email, name, code = code.as_str(), "Console OTP delivery");
        eprintln!("Verification code for {} <{}>: {}", name, email, code);
        DeliveryReport::sent("OTP sent successfully")
    }
}
