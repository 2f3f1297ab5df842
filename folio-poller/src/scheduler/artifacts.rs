//! Terminal artifact fetch
//!
//! Once a job completes, its final response, reflection and execution trace
//! are requested together. Each request stands alone: one failing does not
//! hold back or discard the others, and nothing is retried.

use folio_core::domain::session::{ArtifactFailure, ArtifactKind, Session};
use folio_core::dto::research::{ExecutionResponse, ReflectionResponse, ResultResponse};

use crate::error::ArtifactFetchError;
use crate::repository::JobRepository;

/// Per-artifact outcome of the terminal fetch
#[derive(Debug)]
pub struct TerminalArtifacts {
    pub final_response: Result<ResultResponse, ArtifactFetchError>,
    pub reflection: Result<ReflectionResponse, ArtifactFetchError>,
    pub execution: Result<ExecutionResponse, ArtifactFetchError>,
}

impl TerminalArtifacts {
    /// Requests all three artifacts concurrently and waits for every one to settle
    pub async fn fetch<R>(repository: &R, session_id: &str) -> Self
    where
        R: JobRepository + ?Sized,
    {
        let (final_response, reflection, execution) = tokio::join!(
            repository.result(session_id),
            repository.reflection(session_id),
            repository.execution(session_id),
        );

        Self {
            final_response: final_response
                .map_err(|e| ArtifactFetchError::new(ArtifactKind::FinalResponse, e)),
            reflection: reflection.map_err(|e| ArtifactFetchError::new(ArtifactKind::Reflection, e)),
            execution: execution
                .map_err(|e| ArtifactFetchError::new(ArtifactKind::ExecutionHistory, e)),
        }
    }

    /// Artifacts that could not be loaded
    pub fn failures(&self) -> impl Iterator<Item = &ArtifactFetchError> {
        [
            self.final_response.as_ref().err(),
            self.reflection.as_ref().err(),
            self.execution.as_ref().err(),
        ]
        .into_iter()
        .flatten()
    }

    /// Copies loaded artifacts into the session and records the failures
    pub fn apply_to(&self, session: &mut Session) {
        if let Ok(result) = &self.final_response {
            session.final_response = Some(result.response.clone());
        }
        if let Ok(reflection) = &self.reflection {
            session.reflection = Some(reflection.reflection.clone());
        }
        if let Ok(execution) = &self.execution {
            session.execution_history = Some(execution.execution_history.clone());
        }

        session
            .artifact_failures
            .extend(self.failures().map(ArtifactFailure::from));
    }
}
