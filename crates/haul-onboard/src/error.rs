use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::onboarding::{
    GatewayError, UnknownVehicleType, ValidationError, WizardError,
};
use crate::workflows::tracking::TrackingError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Input(String),
    Serialization(serde_json::Error),
    Validation(ValidationError),
    Gateway(GatewayError),
    Wizard(WizardError),
    Submission(String),
    Tracking(TrackingError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::Validation(err) => write!(f, "{} step incomplete: {}", err.step.title(), err),
            AppError::Gateway(err) => write!(f, "gateway error: {}", err),
            AppError::Wizard(err) => write!(f, "wizard error: {}", err),
            AppError::Submission(message) => write!(f, "submission failed: {}", message),
            AppError::Tracking(err) => write!(f, "tracking error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Input(_) => None,
            AppError::Serialization(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Gateway(err) => Some(err),
            AppError::Wizard(err) => Some(err),
            AppError::Submission(_) => None,
            AppError::Tracking(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<WizardError> for AppError {
    fn from(value: WizardError) -> Self {
        Self::Wizard(value)
    }
}

impl From<TrackingError> for AppError {
    fn from(value: TrackingError) -> Self {
        Self::Tracking(value)
    }
}

impl From<UnknownVehicleType> for AppError {
    fn from(value: UnknownVehicleType) -> Self {
        Self::Input(value.to_string())
    }
}
