use crate::allocation::TieBreak;
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Log filter used when `MATCHED_LOG_LEVEL` is unset. Production runs only
    /// report warnings and errors.
    pub fn default_log_level(self) -> &'static str {
        match self {
            Self::Production => "warn",
            Self::Development | Self::Test => "info",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub allocation: AllocationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("MATCHED_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("MATCHED_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        let tie_break = match env::var("MATCHED_TIE_BREAK") {
            Ok(value) => {
                TieBreak::parse(&value).ok_or(ConfigError::InvalidTieBreak { value })?
            }
            Err(_) => TieBreak::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            allocation: AllocationConfig { tie_break },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to every allocation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationConfig {
    pub tie_break: TieBreak,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTieBreak { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTieBreak { value } => write!(
                f,
                "MATCHED_TIE_BREAK must be `input-order` or `student-id`, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
