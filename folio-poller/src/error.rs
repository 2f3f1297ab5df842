//! Error taxonomy of the session poller
//!
//! Only [`SubmissionError`] is returned to callers. [`PollError`] is absorbed
//! by the retry schedule and [`ArtifactFetchError`] is recorded on the session.

use folio_client::ClientError;
use folio_core::domain::session::{ArtifactFailure, ArtifactKind};
use thiserror::Error;

/// A job could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Nothing left to submit after trimming
    #[error("Query is empty")]
    EmptyInput,

    /// The configured endpoint is a placeholder or local address
    #[error("Research agent is not connected ({url})")]
    NotConnected { url: String },

    /// The service answered with a non-success status
    #[error("Start failed ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No response was received
    #[error("Start failed: {0}")]
    Network(String),

    /// A success response that cannot start a session
    #[error("Start failed: {0}")]
    InvalidResponse(String),
}

impl SubmissionError {
    /// HTTP status that rejected the submission, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for SubmissionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } => {
                SubmissionError::Rejected { status, message }
            }
            ClientError::ParseError(msg) => SubmissionError::InvalidResponse(msg),
            other => SubmissionError::Network(other.to_string()),
        }
    }
}

/// A single status check failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Status failed ({status})")]
    Rejected { status: u16 },

    #[error("Status request failed: {0}")]
    Network(String),

    #[error("Status response unreadable: {0}")]
    InvalidResponse(String),
}

impl From<ClientError> for PollError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, .. } => PollError::Rejected { status },
            ClientError::ParseError(msg) => PollError::InvalidResponse(msg),
            other => PollError::Network(other.to_string()),
        }
    }
}

/// One terminal artifact could not be fetched
#[derive(Debug, Error)]
#[error("Failed to fetch {artifact}: {source}")]
pub struct ArtifactFetchError {
    pub artifact: ArtifactKind,
    #[source]
    pub source: ClientError,
}

impl ArtifactFetchError {
    pub fn new(artifact: ArtifactKind, source: ClientError) -> Self {
        Self { artifact, source }
    }
}

impl From<&ArtifactFetchError> for ArtifactFailure {
    fn from(err: &ArtifactFetchError) -> Self {
        ArtifactFailure {
            artifact: err.artifact,
            message: err.source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error_keeps_status() {
        let err = SubmissionError::from(ClientError::api_error(500, "boom"));
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Start failed (500): boom");
    }

    #[test]
    fn test_submission_error_from_parse_error() {
        let err = SubmissionError::from(ClientError::ParseError("not json".to_string()));
        assert!(matches!(err, SubmissionError::InvalidResponse(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_poll_error_from_client_error() {
        assert_eq!(
            PollError::from(ClientError::api_error(502, "bad gateway")),
            PollError::Rejected { status: 502 }
        );
        assert!(matches!(
            PollError::from(ClientError::InvalidRequest("x".to_string())),
            PollError::Network(_)
        ));
    }

    #[test]
    fn test_artifact_failure_record() {
        let err = ArtifactFetchError::new(
            ArtifactKind::Reflection,
            ClientError::api_error(404, "no reflection"),
        );
        let failure = ArtifactFailure::from(&err);

        assert_eq!(failure.artifact, ArtifactKind::Reflection);
        assert!(failure.message.contains("404"));
        assert!(err.to_string().starts_with("Failed to fetch reflection"));
    }
}
