use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_SUBMISSION_URL: &str = "http://127.0.0.1:8080/api/drivers/applications";
const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRACKING_DELAY_MS: u64 = 1500;

/// Distinguishes runtime behavior for different stages of the toolkit.
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
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub submission: SubmissionConfig,
    pub tracking: TrackingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let endpoint =
            env::var("HAUL_SUBMISSION_URL").unwrap_or_else(|_| DEFAULT_SUBMISSION_URL.to_string());
        validate_endpoint(&endpoint)?;

        let timeout_secs = match env::var("HAUL_SUBMISSION_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_SUBMISSION_TIMEOUT_SECS,
        };

        let delay_ms = match env::var("HAUL_TRACKING_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTrackingDelay)?,
            Err(_) => DEFAULT_TRACKING_DELAY_MS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            submission: SubmissionConfig {
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
            },
            tracking: TrackingConfig {
                simulated_delay: Duration::from_millis(delay_ms),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how finished applications are sent.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl SubmissionConfig {
    pub fn with_endpoint(mut self, endpoint: String) -> Result<Self, ConfigError> {
        validate_endpoint(&endpoint)?;
        self.endpoint = endpoint;
        Ok(self)
    }
}

/// Cosmetic latency applied to tracking lookups.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub simulated_delay: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(endpoint).map_err(|err| ConfigError::InvalidEndpoint {
        value: endpoint.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidEndpoint {
            value: endpoint.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEndpoint { value: String, reason: String },
    InvalidTimeout,
    InvalidTrackingDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint { value, reason } => write!(
                f,
                "HAUL_SUBMISSION_URL must be an http(s) URL (found '{}': {})",
                value, reason
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "HAUL_SUBMISSION_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidTrackingDelay => {
                write!(f, "HAUL_TRACKING_DELAY_MS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serialises tests that read or mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
