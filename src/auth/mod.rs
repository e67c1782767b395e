// auth/mod.rs - Email one-time-passcode signup and login
//
// Login is a plain registry lookup. Signup proves ownership of the email
// by sending a 6-digit code through a CodeDelivery implementation and
// checking it in memory; the code is never persisted.

use thiserror::Error;

pub mod delivery;
pub mod flow;
pub mod otp;
pub mod registry;
pub mod session;

pub use delivery::{CodeDelivery, ConsoleDelivery, DeliveryReport, RelayDelivery};
pub use flow::{AuthFlow, AuthMode, FlowDelays};
pub use otp::{OtpCode, OtpInput, OTP_LENGTH};
pub use registry::{StoredUser, UserRegistry};
pub use session::{Session, SessionHolder};

/// Auth failures. All are recoverable: the flow stays where it was and the
/// message is shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email not found. Please sign up first.")]
    NotRegistered(String),

    #[error("Email already registered. Please login instead.")]
    AlreadyRegistered(String),

    #[error("Invalid OTP. Please check and try again.")]
    InvalidCode,

    #[error("Enter all {} digits of the code.", OTP_LENGTH)]
    IncompleteCode,

    #[error("{0}")]
    DeliveryFailed(String),

    #[error("Cannot {action} while in {mode:?} state")]
    WrongState { action: &'static str, mode: AuthMode },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}
