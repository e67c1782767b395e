use std::fmt;

use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of digits in a verification code
pub const OTP_LENGTH: usize = 6;

const OTP_MIN: u32 = 100_000;
const OTP_MAX: u32 = 999_999;

/// A generated verification code. Lives only in memory for the duration of a signup.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Uniformly random code in 100000..=999999
    pub fn generate() -> Self {
        let value: u32 = rand::rng().random_range(OTP_MIN..=OTP_MAX);
        OtpCode(format!("{:0width$}", value, width = OTP_LENGTH))
    }

    /// Wrap an existing code; `None` unless exactly six ASCII digits
    pub fn parse(digits: &str) -> Option<Self> {
        (digits.len() == OTP_LENGTH && digits.bytes().all(|b| b.is_ascii_digit()))
            .then(|| OtpCode(digits.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison, constant time over the code bytes
    pub fn matches(&self, entered: &str) -> bool {
        bool::from(self.0.as_bytes().ct_eq(entered.as_bytes()))
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six single-digit boxes the user types into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one box. Accepts a single ASCII digit, or an empty string to
    /// clear it; anything else is ignored and `false` returned.
    pub fn set_digit(&mut self, index: usize, value: &str) -> bool {
        if index >= OTP_LENGTH {
            return false;
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.slots[index] = None;
                true
            }
            (Some(c), None) if c.is_ascii_digit() => {
                self.slots[index] = Some(c);
                true
            }
            _ => false,
        }
    }

    /// Replace all boxes from a pasted code. Rejects anything but up to six digits.
    pub fn fill(&mut self, code: &str) -> bool {
        let code = code.trim();
        if code.chars().count() > OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        self.clear();
        for (slot, c) in self.slots.iter_mut().zip(code.chars()) {
            *slot = Some(c);
        }
        true
    }

    pub fn clear(&mut self) {
        self.slots = [None; OTP_LENGTH];
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Entered digits joined in order, skipping empty boxes
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }
}
