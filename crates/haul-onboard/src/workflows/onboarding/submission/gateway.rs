use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use super::super::payload::ApplicationPayload;
use crate::config::SubmissionConfig;

/// Shown for every failure that carries no server-provided message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Submission failed. Please try again.";

/// Acknowledgement returned by the remote endpoint on a 2xx response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Failure of the single outbound call. No retry policy is attached to any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("submission rejected with HTTP {status}{}", rejection_suffix(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("submission transport failed: {0}")]
    Transport(String),
    #[error("submission payload could not be built: {0}")]
    Payload(String),
}

impl GatewayError {
    /// Text surfaced to the applicant. Transport and payload details stay in the logs.
    pub fn user_message(&self) -> String {
        let server_message = match self {
            GatewayError::Rejected { message, .. } => message.as_deref(),
            GatewayError::Transport(_) | GatewayError::Payload(_) => None,
        };

        server_message
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

/// Remote collaborator receiving finished applications.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    async fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError>;
}

/// Posts the multipart payload to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpApplicationGateway {
    client: Client,
    endpoint: Url,
}

impl HttpApplicationGateway {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            GatewayError::Transport(format!("invalid endpoint '{endpoint}': {err}"))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &SubmissionConfig) -> Result<Self, GatewayError> {
        Self::new(&config.endpoint, config.timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ApplicationGateway for HttpApplicationGateway {
    async fn submit_application(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let form = payload
            .into_multipart()
            .map_err(|err| GatewayError::Payload(err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let raw = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let body: Option<Value> = serde_json::from_slice(&raw).ok();

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: body.as_ref().and_then(|value| string_field(value, "message")),
            });
        }

        let reference = body.as_ref().and_then(|value| {
            string_field(value, "id").or_else(|| string_field(value, "reference"))
        });

        Ok(SubmissionReceipt {
            status: status.as_u16(),
            reference,
            body,
        })
    }
}

fn rejection_suffix(message: &Option<String>) -> String {
    match message {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
