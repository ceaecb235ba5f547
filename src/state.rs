//! Application state management
//!
//! This module wires the services together around one backend and one
//! session repository. The console front-end holds a single [`AppState`].

use std::sync::Arc;

use crate::{
    backend::{ContestBackend, HttpBackend},
    config::Config,
    error::ClientResult,
    services::{Clock, ExecutionService, SessionService, SubmissionService, SystemClock},
    storage::{FileRepository, SessionRepository},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    session: Arc<SessionService>,
    execution: ExecutionService,
    submission: SubmissionService,
}

impl AppState {
    /// Create a new application state from explicit collaborators
    pub fn new(
        config: Config,
        backend: Arc<dyn ContestBackend>,
        repo: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = Arc::new(SessionService::new(
            backend.clone(),
            repo,
            clock,
            config.clone(),
        ));
        let execution = ExecutionService::new(backend.clone(), session.clone(), config.clone());
        let submission = SubmissionService::new(backend, session.clone(), config);

        Self {
            inner: Arc::new(AppStateInner {
                session,
                execution,
                submission,
            }),
        }
    }

    /// Production wiring: HTTP backend, file-backed store and the system clock
    pub fn from_config(config: Config) -> ClientResult<Self> {
        let backend = Arc::new(HttpBackend::new(&config.backend)?);
        let repo = Arc::new(FileRepository::open(config.session.state_path.clone())?);
        tracing::info!(
            api_url = %config.backend.api_url,
            state_path = %config.session.state_path.display(),
            "Client state initialized"
        );
        Ok(Self::new(config, backend, repo, Arc::new(SystemClock)))
    }

    pub fn session(&self) -> &SessionService {
        &self.inner.session
    }

    pub fn execution(&self) -> &ExecutionService {
        &self.inner.execution
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.inner.submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;
    use crate::test_utils::{FakeBackend, ManualClock};
    use chrono::Utc;

    #[tokio::test]
    async fn test_services_share_one_session() {
        let state = AppState::new(
            Config::default(),
            Arc::new(FakeBackend::default()),
            Arc::new(MemoryRepository::new()),
            Arc::new(ManualClock::new(Utc::now())),
        );
        state.session().login("dragon", "warrior").await.unwrap();

        let outcome = state
            .submission()
            .submit(1, "print(1)", crate::models::Language::Python)
            .await
            .unwrap();
        assert!(outcome.is_accepted());
        assert!(state.session().is_solved(1).unwrap());
    }
}
