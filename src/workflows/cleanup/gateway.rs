use std::fmt::Debug;

use super::domain::{Application, ApplicationId, ScanReport};

/// Failure reported by an [`IqGateway`] call.
///
/// Non-2xx responses and undecodable bodies are separate variants so callers
/// can report the status and body the server sent back.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("http client unavailable: {0}")]
    Setup(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::Decode { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Synchronous view of the IQ Server REST API used by the cleanup workflow.
pub trait IqGateway: Debug {
    /// `GET /api/v2/applications`, returning the `applications` array.
    fn list_applications(&self) -> Result<Vec<Application>, GatewayError>;

    /// `GET /api/v2/reports/applications/{id}`, most recent report first.
    fn scan_history(&self, id: &ApplicationId) -> Result<Vec<ScanReport>, GatewayError>;

    /// `DELETE /api/v2/applications/{id}`.
    fn delete_application(&self, id: &ApplicationId) -> Result<(), GatewayError>;
}
