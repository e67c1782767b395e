// relay/mod.rs - Mail relay service
//
// Single-purpose HTTP service: accepts `{email, otp, name}` and forwards the
// verification code through an email provider. Holds no user data.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::config::{ConfigError, RelayConfig};

pub mod error;
pub mod handlers;
pub mod mailer;
pub mod response;

pub use error::RelayError;
pub use mailer::{LogMailer, Mailer, MailerError, OutgoingEmail, ResendMailer};

#[derive(Clone)]
pub struct RelayState {
    pub mailer: Arc<dyn Mailer>,
    pub from_address: String,
}

impl RelayState {
    pub fn new(mailer: Arc<dyn Mailer>, from_address: impl Into<String>) -> Self {
        Self {
            mailer,
            from_address: from_address.into(),
        }
    }

    /// Resend when an API key is configured, otherwise the log mailer
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
            Some(key) => Arc::new(ResendMailer::new(config.resend_url()?, key.clone())),
            None => {
                warn!("RESEND_API_KEY not set; OTP emails will only be logged");
                Arc::new(LogMailer)
            }
        };
        Ok(Self::new(mailer, config.from_address.clone()))
    }
}

pub fn app(state: RelayState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/send-otp", post(handlers::send_otp))
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
