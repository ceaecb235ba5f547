//! Session store
//!
//! Owns team identity, the problem cache and the submission-status snapshot,
//! all persisted through a [`SessionRepository`]. Every read of the session
//! evaluates the persistent clock first; an expired session is destroyed
//! together with its caches and the read fails with `SessionExpired`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use validator::Validate;

use super::clock_service::{Clock, PersistentClock};
use crate::{
    backend::{ContestBackend, request::LoginRequest},
    config::Config,
    constants::storage_keys,
    error::{ClientError, ClientResult},
    models::{Problem, ProblemCache, Session, SubmissionStatus, TeamIdentity},
    storage::{self, SessionRepository},
    utils::with_deadline,
};

/// Submission statuses plus an optional one-time warning
#[derive(Debug)]
pub struct SubmissionSync {
    pub status: SubmissionStatus,
    /// Set only on the first failed sync of a session
    pub warning: Option<ClientError>,
}

/// Session store for contest state
pub struct SessionService {
    backend: Arc<dyn ContestBackend>,
    repo: Arc<dyn SessionRepository>,
    clock: PersistentClock,
    config: Config,
    sync_warned: AtomicBool,
}

impl SessionService {
    /// Create a new session store
    pub fn new(
        backend: Arc<dyn ContestBackend>,
        repo: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            clock: PersistentClock::new(repo.clone(), clock, config.session.duration_seconds),
            backend,
            repo,
            config,
            sync_warned: AtomicBool::new(false),
        }
    }

    pub fn clock(&self) -> &PersistentClock {
        &self.clock
    }

    /// Authenticate against the backend and open (or resume) the session
    pub async fn login(&self, team_name: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            team_name: team_name.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let team = with_deadline(
            self.config.backend.request_timeout,
            "logging in",
            self.backend.login(&request),
        )
        .await?;

        tracing::info!(team_id = %team.team_id, team_name = %team.team_name, "Team logged in");
        self.establish(team)
    }

    /// Persist `team` as the active identity and start the clock if needed
    ///
    /// State left behind by a different team is dropped first so nothing
    /// leaks across accounts.
    pub fn establish(&self, team: TeamIdentity) -> ClientResult<Session> {
        let previous: Option<TeamIdentity> = storage::load_json(&*self.repo, storage_keys::TEAM_INFO)?;
        let foreign_snapshot = storage::load_json::<SubmissionStatus>(&*self.repo, storage_keys::SUBMISSIONS)?
            .is_some_and(|s| s.team_id != team.team_id);

        if previous.as_ref().is_some_and(|p| p.team_id != team.team_id) {
            tracing::info!(team_id = %team.team_id, "Discarding state of a different team");
            self.repo.remove_many(storage_keys::ALL)?;
        } else if foreign_snapshot {
            self.repo.remove_many(&[storage_keys::SUBMISSIONS])?;
        }

        storage::store_json(&*self.repo, storage_keys::TEAM_INFO, &team)?;
        self.clock.ensure_started()?;
        self.sync_warned.store(false, Ordering::SeqCst);

        self.current_session()
    }

    /// Delete the session and every derived cache in one write
    pub fn logout(&self) -> ClientResult<()> {
        self.repo.remove_many(storage_keys::ALL)?;
        self.sync_warned.store(false, Ordering::SeqCst);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Read the active session, checking the clock first
    ///
    /// Never starts the clock: a missing or malformed start timestamp ends the
    /// session, so only a fresh login can begin a new attempt.
    pub fn current_session(&self) -> ClientResult<Session> {
        let Some(team) = storage::load_json::<TeamIdentity>(&*self.repo, storage_keys::TEAM_INFO)? else {
            return Err(ClientError::NotAuthenticated);
        };

        let Some(start) = self.clock.start()? else {
            tracing::warn!(team_id = %team.team_id, "Timer start missing; clearing local state");
            self.repo.remove_many(storage_keys::ALL)?;
            return Err(ClientError::NotAuthenticated);
        };
        let duration_seconds = self.clock.duration_seconds();
        let remaining_seconds =
            super::clock_service::remaining_seconds(start, self.clock.now(), duration_seconds);

        if remaining_seconds == 0 {
            tracing::warn!(team_id = %team.team_id, "Session expired; clearing local state");
            self.repo.remove_many(storage_keys::ALL)?;
            return Err(ClientError::SessionExpired);
        }

        Ok(Session {
            team,
            start,
            duration_seconds,
            remaining_seconds,
        })
    }

    /// Whether a session is active and unexpired
    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_ok()
    }

    /// Problem list, served from cache when one exists
    pub async fn load_problems(&self) -> ClientResult<ProblemCache> {
        self.current_session()?;

        if let Some(cache) = storage::load_json::<ProblemCache>(&*self.repo, storage_keys::PROBLEMS)? {
            if !cache.is_empty() {
                tracing::debug!(count = cache.len(), "Using cached problems");
                return Ok(cache);
            }
        }

        self.refresh_problems().await
    }

    /// Fetch the problem list from the backend and replace the cache
    ///
    /// On failure the existing cache is left untouched.
    pub async fn refresh_problems(&self) -> ClientResult<ProblemCache> {
        self.current_session()?;

        let problems = with_deadline(
            self.config.backend.problems_timeout,
            "loading problems",
            self.backend.problems(),
        )
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load problems"))?;

        let cache = ProblemCache::new(problems);
        storage::store_json(&*self.repo, storage_keys::PROBLEMS, &cache)?;
        tracing::info!(count = cache.len(), "Problems loaded");
        Ok(cache)
    }

    /// Look up a single problem
    pub async fn problem(&self, problem_id: i64) -> ClientResult<Problem> {
        self.load_problems()
            .await?
            .find(problem_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Challenge {problem_id}")))
    }

    /// Refresh submission statuses from the backend
    ///
    /// On failure the last persisted snapshot is returned instead. The first
    /// failure in a session carries a `SyncDegraded` warning; later ones do not.
    pub async fn sync_submissions(&self) -> ClientResult<SubmissionSync> {
        let session = self.current_session()?;
        let team_id = session.team_id();

        let fetched = with_deadline(
            self.config.backend.request_timeout,
            "syncing submissions",
            self.backend.submissions(team_id),
        )
        .await;

        match fetched {
            Ok(entries) => {
                let status = SubmissionStatus::from_entries(
                    team_id,
                    entries.into_iter().map(|e| (e.problem_id, e.status)),
                );
                storage::store_json(&*self.repo, storage_keys::SUBMISSIONS, &status)?;
                tracing::debug!(solved = status.solved_count(), "Submissions synced");
                Ok(SubmissionSync {
                    status,
                    warning: None,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch submissions; using cached data if available");
                let warning = (!self.sync_warned.swap(true, Ordering::SeqCst))
                    .then(|| ClientError::SyncDegraded(e.to_string()));
                Ok(SubmissionSync {
                    status: self.cached_status(team_id)?,
                    warning,
                })
            }
        }
    }

    /// Last persisted statuses of the active team, without a network call
    pub fn submission_status(&self) -> ClientResult<SubmissionStatus> {
        let session = self.current_session()?;
        self.cached_status(session.team_id())
    }

    /// Check if the active team has solved `problem_id`
    pub fn is_solved(&self, problem_id: i64) -> ClientResult<bool> {
        Ok(self.submission_status()?.is_solved(problem_id))
    }

    /// Record an accepted submission in the persisted snapshot
    pub(crate) fn record_accepted(&self, problem_id: i64) -> ClientResult<()> {
        let mut status = self.submission_status()?;
        status.mark_accepted(problem_id);
        storage::store_json(&*self.repo, storage_keys::SUBMISSIONS, &status)
    }

    fn cached_status(&self, team_id: i64) -> ClientResult<SubmissionStatus> {
        let cached = storage::load_json::<SubmissionStatus>(&*self.repo, storage_keys::SUBMISSIONS)?;
        Ok(cached
            .filter(|s| s.team_id == team_id)
            .unwrap_or_else(|| SubmissionStatus::new(team_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::response::SubmissionEntry;
    use crate::storage::MemoryRepository;
    use crate::test_utils::{FakeBackend, ManualClock};
    use chrono::{DateTime, Duration, Utc};

    struct Harness {
        backend: Arc<FakeBackend>,
        repo: Arc<MemoryRepository>,
        clock: Arc<ManualClock>,
        service: SessionService,
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn harness() -> Harness {
        let backend = Arc::new(FakeBackend::default());
        let repo = Arc::new(MemoryRepository::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let service = SessionService::new(
            backend.clone(),
            repo.clone(),
            clock.clone(),
            Config::default(),
        );
        Harness {
            backend,
            repo,
            clock,
            service,
        }
    }

    #[tokio::test]
    async fn test_login_creates_session_and_clock() {
        let h = harness();
        let session = h.service.login("dragon", "warrior").await.unwrap();
        assert_eq!(session.team_id(), 1);
        assert_eq!(session.start, t0());
        assert_eq!(session.remaining_seconds, 3600);
        assert!(h.repo.get(storage_keys::TIMER_START).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_and_blank_fields() {
        let h = harness();
        let err = h.service.login("dragon", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::AuthError(_)));

        let err = h.service.login("  ", "warrior").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(h.backend.calls("login"), 1);
        assert!(!h.service.is_authenticated());
    }

    #[tokio::test]
    async fn test_relogin_keeps_original_start() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.clock.advance(Duration::minutes(40));

        let session = h.service.login("dragon", "warrior").await.unwrap();
        assert_eq!(session.start, t0());
        assert_eq!(session.remaining_seconds, 20 * 60);
    }

    #[tokio::test]
    async fn test_login_as_other_team_drops_foreign_state() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.service.record_accepted(1).unwrap();
        h.clock.advance(Duration::minutes(10));

        let session = h.service.login("five", "furious").await.unwrap();
        assert_eq!(session.team_id(), 2);
        assert_eq!(session.remaining_seconds, 3600);
        assert!(!h.service.is_solved(1).unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.service.load_problems().await.unwrap();
        h.service.record_accepted(1).unwrap();

        h.service.logout().unwrap();
        for key in storage_keys::ALL {
            assert_eq!(h.repo.get(key).unwrap(), None, "{key} survived logout");
        }
        assert!(matches!(
            h.service.current_session(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_destroyed() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.clock.advance(Duration::milliseconds(3_700_000));

        assert!(matches!(
            h.service.current_session(),
            Err(ClientError::SessionExpired)
        ));
        assert_eq!(h.repo.get(storage_keys::TEAM_INFO).unwrap(), None);
        assert!(matches!(
            h.service.load_problems().await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_corrupt_team_info_reads_as_logged_out() {
        let h = harness();
        h.repo.set(storage_keys::TEAM_INFO, "{\"team_id\": \"oops\"").unwrap();
        assert!(matches!(
            h.service.current_session(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_timer_does_not_restart_contest() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.clock.advance(Duration::minutes(59));
        h.repo.set(storage_keys::TIMER_START, "garbage").unwrap();

        assert!(matches!(
            h.service.current_session(),
            Err(ClientError::NotAuthenticated)
        ));
        for key in storage_keys::ALL {
            assert_eq!(h.repo.get(key).unwrap(), None, "{key} survived");
        }
        assert!(!h.service.is_authenticated());
    }

    #[tokio::test]
    async fn test_problems_are_cached_after_first_fetch() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();

        let first = h.service.load_problems().await.unwrap();
        let second = h.service.load_problems().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.backend.calls("problems"), 1);
        assert_eq!(h.service.problem(1).await.unwrap().title, "Mantis");
        assert!(matches!(
            h.service.problem(99).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_cache() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        h.service.load_problems().await.unwrap();

        *h.backend.problems.lock().unwrap() =
            Err(ClientError::BackendUnreachable("connection refused".to_string()));
        assert!(h.service.refresh_problems().await.is_err());

        let cached = h.service.load_problems().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_problem_fetch_times_out() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        *h.backend.delay.lock().unwrap() = Some(std::time::Duration::from_secs(30));

        let err = h.service.load_problems().await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
        assert_eq!(h.repo.get(storage_keys::PROBLEMS).unwrap(), None);
    }

    #[tokio::test]
    async fn test_sync_warns_once_and_falls_back() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();

        *h.backend.submissions.lock().unwrap() = Ok(vec![SubmissionEntry {
            problem_id: 3,
            status: "Accepted".to_string(),
        }]);
        let synced = h.service.sync_submissions().await.unwrap();
        assert!(synced.warning.is_none());
        assert!(synced.status.is_solved(3));

        *h.backend.submissions.lock().unwrap() =
            Err(ClientError::BackendUnreachable("down".to_string()));
        let first = h.service.sync_submissions().await.unwrap();
        assert!(matches!(first.warning, Some(ClientError::SyncDegraded(_))));
        assert!(first.status.is_solved(3));

        let second = h.service.sync_submissions().await.unwrap();
        assert!(second.warning.is_none());
        assert!(second.status.is_solved(3));
    }

    #[tokio::test]
    async fn test_sync_falls_back_to_empty_on_first_run() {
        let h = harness();
        h.service.login("dragon", "warrior").await.unwrap();
        *h.backend.submissions.lock().unwrap() =
            Err(ClientError::Timeout("syncing submissions".to_string()));

        let synced = h.service.sync_submissions().await.unwrap();
        assert_eq!(synced.status.solved_count(), 0);
        assert!(synced.warning.is_some());
    }
}
