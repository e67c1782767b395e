mod common;

use std::sync::Arc;

use anyhow::Result;

use common::RecordingDelivery;
use expense_tracker::auth::{AuthError, AuthFlow, AuthMode, FlowDelays, OtpCode};
use expense_tracker::AppContext;

fn flow_with_code(delivery: Arc<RecordingDelivery>, code: &'static str) -> AuthFlow {
    AuthFlow::new(delivery, FlowDelays::none())
        .with_code_generator(Arc::new(move || OtpCode::parse(code).unwrap()))
}

#[tokio::test]
async fn signup_rejects_wrong_code_then_accepts_right_one() -> Result<()> {
    let (_dir, mut ctx) = common::temp_context()?;
    let delivery = Arc::new(RecordingDelivery::default());
    let mut flow = flow_with_code(delivery.clone(), "123456");

    flow.switch_to_signup()?;
    flow.submit_signup(&ctx, "a@b.com", "Ada").await?;
    assert_eq!(flow.mode(), AuthMode::Verify);
    assert_eq!(delivery.last_code().as_deref(), Some("123456"));

    flow.enter_code("111111");
    let err = flow.submit_verify(&mut ctx).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
    assert_eq!(flow.mode(), AuthMode::Verify);
    assert_eq!(flow.last_error(), Some("Invalid OTP. Please check and try again."));

    for (i, digit) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
        assert!(flow.enter_digit(i, digit));
    }
    flow.submit_verify(&mut ctx).await?;

    assert_eq!(flow.mode(), AuthMode::Authenticated);
    assert!(ctx.users().exists("a@b.com"));
    assert_eq!(ctx.require_session()?.email, "a@b.com");
    assert_eq!(delivery.count(), 1, "a failed verify must not issue a new code");
    Ok(())
}

#[tokio::test]
async fn login_with_unregistered_email_stays_in_login() -> Result<()> {
    let (_dir, mut ctx) = common::temp_context()?;
    let mut flow = AuthFlow::new(Arc::new(RecordingDelivery::default()), FlowDelays::none());

    let err = flow.submit_login(&mut ctx, "ghost@nowhere.com").await.unwrap_err();

    assert!(matches!(err, AuthError::NotRegistered(_)));
    assert_eq!(flow.mode(), AuthMode::Login);
    assert!(ctx.session().is_none());
    Ok(())
}

#[tokio::test]
async fn registered_user_can_log_in_after_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let mut ctx = AppContext::open_dir(dir.path())?;
        let delivery = Arc::new(RecordingDelivery::default());
        let mut flow = AuthFlow::new(delivery.clone(), FlowDelays::none());
        flow.switch_to_signup()?;
        flow.submit_signup(&ctx, "a@b.com", "Ada").await?;
        let code = delivery.last_code().unwrap();
        flow.enter_code(&code);
        flow.submit_verify(&mut ctx).await?;
        ctx.logout()?;
    }

    let mut ctx = AppContext::open_dir(dir.path())?;
    assert!(ctx.session().is_none());
    let mut flow = AuthFlow::new(Arc::new(RecordingDelivery::default()), FlowDelays::none());
    flow.submit_login(&mut ctx, "a@b.com").await?;

    assert_eq!(flow.mode(), AuthMode::Authenticated);
    assert_eq!(ctx.require_session()?.name, "Ada");
    Ok(())
}

#[tokio::test]
async fn abandoned_signup_leaves_no_account() -> Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let ctx = AppContext::open_dir(dir.path())?;
        let mut flow = AuthFlow::new(Arc::new(RecordingDelivery::default()), FlowDelays::none());
        flow.switch_to_signup()?;
        flow.submit_signup(&ctx, "a@b.com", "Ada").await?;
        assert_eq!(flow.mode(), AuthMode::Verify);
    }

    let ctx = AppContext::open_dir(dir.path())?;
    assert!(!ctx.users().exists("a@b.com"));
    for entry in std::fs::read_dir(dir.path())? {
        let raw = std::fs::read_to_string(entry?.path())?;
        assert!(!raw.contains("otp"), "verification code must not be persisted");
    }
    Ok(())
}

#[tokio::test]
async fn failed_delivery_keeps_signup_form() -> Result<()> {
    let (_dir, ctx) = common::temp_context()?;
    let delivery = Arc::new(RecordingDelivery::failing("Failed to send OTP. Please check your connection."));
    let mut flow = AuthFlow::new(delivery, FlowDelays::none());
    flow.switch_to_signup()?;

    let err = flow.submit_signup(&ctx, "a@b.com", "Ada").await.unwrap_err();

    assert!(matches!(err, AuthError::DeliveryFailed(_)));
    assert_eq!(flow.mode(), AuthMode::Signup);
    assert_eq!(flow.last_error(), Some("Failed to send OTP. Please check your connection."));
    Ok(())
}
