use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_RELAY_PORT: u16 = 3001;
pub const DEFAULT_FROM_ADDRESS: &str = "Expense Tracker <onboarding@resend.dev>";
pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("HOME environment variable not set and TRACKER_DATA_DIR not given")]
    NoDataDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub delivery: DeliveryConfig,
    pub relay: RelayConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `None` means `$HOME/.config/expense-tracker`
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub login_delay_ms: u64,
    pub verify_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Console,
    Relay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    pub relay_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub port: u16,
    pub resend_api_key: Option<String>,
    pub resend_endpoint: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub allow_negative_expenses: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl StorageConfig {
    pub fn resolve_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| ConfigError::NoDataDir)?;
        Ok(PathBuf::from(home).join(".config").join("expense-tracker"))
    }
}

impl DeliveryConfig {
    pub fn relay_endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.relay_url).map_err(|source| ConfigError::InvalidUrl {
            field: "delivery.relay_url",
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RelayConfig {
    pub fn resend_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.resend_endpoint).map_err(|source| ConfigError::InvalidUrl {
            field: "relay.resend_endpoint",
            source,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Storage overrides
        if let Ok(v) = env::var("TRACKER_DATA_DIR") {
            if !v.trim().is_empty() {
                self.storage.dir = Some(PathBuf::from(v));
            }
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_LOGIN_DELAY_MS") {
            self.auth.login_delay_ms = v.parse().unwrap_or(self.auth.login_delay_ms);
        }
        if let Ok(v) = env::var("AUTH_VERIFY_DELAY_MS") {
            self.auth.verify_delay_ms = v.parse().unwrap_or(self.auth.verify_delay_ms);
        }

        // Delivery overrides
        if let Ok(v) = env::var("OTP_DELIVERY_MODE") {
            match v.to_ascii_lowercase().as_str() {
                "console" => self.delivery.mode = DeliveryMode::Console,
                "relay" => self.delivery.mode = DeliveryMode::Relay,
                _ => {}
            }
        }
        if let Ok(v) = env::var("OTP_RELAY_URL") {
            self.delivery.relay_url = v;
        }
        if let Ok(v) = env::var("OTP_RELAY_TIMEOUT_SECS") {
            self.delivery.timeout_secs = v.parse().unwrap_or(self.delivery.timeout_secs);
        }

        // Relay overrides; RELAY_PORT wins over the generic PORT
        if let Some(port) = env::var("RELAY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.relay.port = port;
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.relay.resend_api_key = Some(v).filter(|k| !k.trim().is_empty());
        }
        if let Ok(v) = env::var("RESEND_ENDPOINT") {
            self.relay.resend_endpoint = v;
        }
        if let Ok(v) = env::var("RELAY_FROM_ADDRESS") {
            self.relay.from_address = v;
        }

        // Ledger overrides
        if let Ok(v) = env::var("LEDGER_ALLOW_NEGATIVE_EXPENSES") {
            self.ledger.allow_negative_expenses = v.parse().unwrap_or(self.ledger.allow_negative_expenses);
        }

        if let Ok(v) = env::var("LOG_LEVEL") {
            self.logging.level = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            storage: StorageConfig { dir: None },
            auth: AuthConfig {
                login_delay_ms: 1200,
                verify_delay_ms: 1000,
            },
            delivery: DeliveryConfig {
                mode: DeliveryMode::Console,
                relay_url: format!("http://localhost:{}/api/send-otp", DEFAULT_RELAY_PORT),
                timeout_secs: 10,
            },
            relay: RelayConfig {
                port: DEFAULT_RELAY_PORT,
                resend_api_key: None,
                resend_endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
                from_address: DEFAULT_FROM_ADDRESS.to_string(),
            },
            ledger: LedgerConfig {
                allow_negative_expenses: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            delivery: DeliveryConfig {
                mode: DeliveryMode::Relay,
                ..Self::development().delivery
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            delivery: DeliveryConfig {
                mode: DeliveryMode::Relay,
                timeout_secs: 15,
                ..Self::development().delivery
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
            ..Self::development()
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
