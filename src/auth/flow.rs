// auth/flow.rs - Login / signup / verify state machine

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::delivery::CodeDelivery;
use super::otp::{OtpCode, OtpInput};
use super::session::Session;
use super::AuthError;
use crate::context::AppContext;

const DEFAULT_LOGIN_DELAY_MS: u64 = 1200;
const DEFAULT_VERIFY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
    Verify,
    Authenticated,
}

/// Cosmetic pauses before completing a login or a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowDelays {
    pub login: Duration,
    pub verify: Duration,
}

impl FlowDelays {
    pub fn from_millis(login_ms: u64, verify_ms: u64) -> Self {
        Self {
            login: Duration::from_millis(login_ms),
            verify: Duration::from_millis(verify_ms),
        }
    }

    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }
}

impl Default for FlowDelays {
    fn default() -> Self {
        Self::from_millis(DEFAULT_LOGIN_DELAY_MS, DEFAULT_VERIFY_DELAY_MS)
    }
}

pub type CodeGenerator = Arc<dyn Fn() -> OtpCode + Send + Sync>;

#[derive(Debug)]
struct PendingSignup {
    email: String,
    name: String,
    code: OtpCode,
}

/// Drives one user through login or signup. The code issued during signup
/// lives only in this value; dropping the flow abandons the signup.
pub struct AuthFlow {
    delivery: Arc<dyn CodeDelivery>,
    generator: CodeGenerator,
    delays: FlowDelays,
    mode: AuthMode,
    pending: Option<PendingSignup>,
    otp: OtpInput,
    last_error: Option<String>,
}

impl AuthFlow {
    pub fn new(delivery: Arc<dyn CodeDelivery>, delays: FlowDelays) -> Self {
        Self {
            delivery,
            generator: Arc::new(OtpCode::generate),
            delays,
            mode: AuthMode::Login,
            pending: None,
            otp: OtpInput::new(),
            last_error: None,
        }
    }

    /// Replace the random code source
    pub fn with_code_generator(mut self, generator: CodeGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Email awaiting verification, if any
    pub fn pending_email(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.email.as_str())
    }

    pub fn otp_input(&self) -> &OtpInput {
        &self.otp
    }

    pub fn switch_to_signup(&mut self) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Login, AuthMode::Signup], "switch to signup")?;
        self.mode = AuthMode::Signup;
        self.last_error = None;
        Ok(())
    }

    pub fn switch_to_login(&mut self) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Login, AuthMode::Signup], "switch to login")?;
        self.mode = AuthMode::Login;
        self.last_error = None;
        Ok(())
    }

    /// Abandon verification and return to the signup form. The issued code is dropped.
    pub fn back_to_signup(&mut self) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Verify], "go back to signup")?;
        self.mode = AuthMode::Signup;
        self.pending = None;
        self.otp.clear();
        self.last_error = None;
        Ok(())
    }

    pub fn enter_digit(&mut self, index: usize, value: &str) -> bool {
        self.otp.set_digit(index, value)
    }

    pub fn enter_code(&mut self, code: &str) -> bool {
        self.otp.fill(code)
    }

    pub async fn submit_login(&mut self, ctx: &mut AppContext, email: &str) -> Result<(), AuthError> {
        let result = self.login(ctx, email).await;
        self.record(result)
    }

    pub async fn submit_signup(
        &mut self,
        ctx: &AppContext,
        email: &str,
        name: &str,
    ) -> Result<(), AuthError> {
        let result = self.signup(ctx, email, name).await;
        self.record(result)
    }

    pub async fn submit_verify(&mut self, ctx: &mut AppContext) -> Result<(), AuthError> {
        let result = self.verify(ctx).await;
        self.record(result)
    }

    async fn login(&mut self, ctx: &mut AppContext, email: &str) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Login], "log in")?;

        let name = match ctx.users().get(email) {
            Some(user) => user.name.clone(),
            None => return Err(AuthError::NotRegistered(email.to_string())),
        };

        pause(self.delays.login).await;

        ctx.establish_session(Session {
            email: email.to_string(),
            name,
        })?;
        self.mode = AuthMode::Authenticated;
        info!(email, "Logged in");
        Ok(())
    }

    async fn signup(&mut self, ctx: &AppContext, email: &str, name: &str) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Signup], "sign up")?;

        if ctx.users().exists(email) {
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }

        let code = (self.generator)();
        debug!(email, "Sending verification code");
        let report = self.delivery.send(email, &code, name).await;
        if !report.success {
            warn!(email, message = %report.message, "Verification code not delivered");
            return Err(AuthError::DeliveryFailed(report.message));
        }

        self.pending = Some(PendingSignup {
            email: email.to_string(),
            name: name.to_string(),
            code,
        });
        self.otp.clear();
        self.mode = AuthMode::Verify;
        info!(email, "Verification code sent");
        Ok(())
    }

    async fn verify(&mut self, ctx: &mut AppContext) -> Result<(), AuthError> {
        self.expect_mode(&[AuthMode::Verify], "verify")?;

        pause(self.delays.verify).await;

        if !self.otp.is_complete() {
            return Err(AuthError::IncompleteCode);
        }

        let pending = match &self.pending {
            Some(p) => p,
            None => return Err(AuthError::WrongState { action: "verify", mode: self.mode }),
        };

        if !pending.code.matches(&self.otp.value()) {
            self.otp.clear();
            warn!(email = %pending.email, "Verification code mismatch");
            return Err(AuthError::InvalidCode);
        }

        ctx.users_mut().save(&pending.email, &pending.name)?;
        ctx.establish_session(Session {
            email: pending.email.clone(),
            name: pending.name.clone(),
        })?;

        info!(email = %pending.email, "Signup verified");
        self.pending = None;
        self.otp.clear();
        self.mode = AuthMode::Authenticated;
        Ok(())
    }

    fn expect_mode(&self, allowed: &[AuthMode], action: &'static str) -> Result<(), AuthError> {
        if allowed.contains(&self.mode) {
            Ok(())
        } else {
            Err(AuthError::WrongState { action, mode: self.mode })
        }
    }

    fn record(&mut self, result: Result<(), AuthError>) -> Result<(), AuthError> {
        self.last_error = result.as_ref().err().map(ToString::to_string);
        result
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
