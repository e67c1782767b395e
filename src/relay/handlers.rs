// relay/handlers.rs - POST /api/send-otp and GET /health

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::error::RelayError;
use super::mailer::OutgoingEmail;
use super::response::{ApiResponse, ApiResult};
use super::RelayState;

pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully";

/// Body of a send request. Fields are optional so that a missing field is
/// reported as such rather than as a JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub name: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /api/send-otp - Email a verification code
///
/// Input: `{"email": "...", "otp": "...", "name": "..."}`, all required and non-empty.
/// Returns the provider payload under `data`.
pub async fn send_otp(
    State(state): State<RelayState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected send-otp body: {}", rejection.body_text());
        RelayError::invalid_json(rejection.body_text())
    })?;

    let (email, otp, name) = match (
        required(request.email),
        required(request.otp),
        required(request.name),
    ) {
        (Some(email), Some(otp), Some(name)) => (email, otp, name),
        _ => return Err(RelayError::MissingFields),
    };

    let message = OutgoingEmail::otp(&state.from_address, &email, &name, &otp);
    let data = state.mailer.send(&message).await?;

    info!(email = %email, "OTP email sent");
    Ok(ApiResponse::success(data).with_message(OTP_SENT_MESSAGE))
}

/// GET /health
pub async fn health() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    })))
}

/// GET / - Service description
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Expense Tracker OTP relay",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "send_otp": "POST /api/send-otp",
            "health": "GET /health",
        }
    })))
}
