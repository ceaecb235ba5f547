//! HTTP transport for the contest backend

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::{
    ContestBackend,
    request::{BatchRunRequest, LoginRequest, RunRequest, SubmitRequest},
    response::{
        BatchRunResponse, ErrorResponse, LoginResponse, RunResponse, SubmissionEntry,
        SubmitResponse, TestCaseResponse,
    },
};
use crate::{
    config::BackendConfig,
    constants::routes,
    error::{ClientError, ClientResult},
    models::{Problem, TeamIdentity, TestCase},
};

/// reqwest-based [`ContestBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_url: String,
    submit_url: String,
}

impl HttpBackend {
    /// Build a transport from configuration
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("contest-client/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.into()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            submit_url: config.submit_url.clone(),
        })
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, base: &str, path: &str) -> RequestBuilder {
        self.client.request(method, Self::url(base, path))
    }

    /// Send a request and log its outcome
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> ClientResult<Response> {
        let start = Instant::now();
        let result = builder.send().await;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_server_error() || status.is_client_error() {
                    warn!(
                        method = %method,
                        path = %path,
                        status = %status.as_u16(),
                        duration_ms = %format!("{:.2}", duration_ms),
                        "Backend request failed"
                    );
                } else {
                    info!(
                        method = %method,
                        path = %path,
                        status = %status.as_u16(),
                        duration_ms = %format!("{:.2}", duration_ms),
                        "Backend request completed"
                    );
                }
                Ok(response)
            }
            Err(e) => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_ms = %format!("{:.2}", duration_ms),
                    error = %e,
                    "Backend request did not complete"
                );
                Err(e.into())
            }
        }
    }

    /// Decode a success body, or turn an error status into a [`ClientError`]
    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<ErrorResponse>().await.unwrap_or_default();
        Err(Self::status_error(status, body))
    }

    fn status_error(status: StatusCode, body: ErrorResponse) -> ClientError {
        let detail = body
            .message()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Backend error").to_string());
        ClientError::Backend {
            status: status.as_u16(),
            detail,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let builder = self.request(Method::GET, &self.api_url, path).query(query);
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, base: &str, path: &str, body: &B) -> ClientResult<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, base, path).json(body);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ContestBackend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> ClientResult<TeamIdentity> {
        match self
            .post_json::<_, LoginResponse>(&self.api_url, routes::LOGIN, request)
            .await
        {
            Ok(team) => Ok(team.into()),
            Err(ClientError::Backend { status, detail }) if status == 401 || status == 403 => {
                Err(ClientError::AuthError(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn problems(&self) -> ClientResult<Vec<Problem>> {
        self.get_json(routes::PROBLEMS, &[]).await
    }

    async fn test_cases(&self, problem_id: i64) -> ClientResult<Vec<TestCase>> {
        let rows: Vec<TestCaseResponse> = self
            .get_json(routes::TESTCASES, &[("problem_id", problem_id.to_string())])
            .await?;
        Ok(rows.into_iter().map(TestCase::from).collect())
    }

    async fn submissions(&self, team_id: i64) -> ClientResult<Vec<SubmissionEntry>> {
        self.get_json(routes::SUBMISSIONS, &[("team_id", team_id.to_string())])
            .await
    }

    async fn run(&self, request: &RunRequest) -> ClientResult<RunResponse> {
        self.post_json(&self.api_url, routes::RUN, request).await
    }

    async fn run_batch(&self, request: &BatchRunRequest) -> ClientResult<BatchRunResponse> {
        self.post_json(&self.api_url, routes::RUN_BATCH, request).await
    }

    async fn submit(&self, request: &SubmitRequest) -> ClientResult<SubmitResponse> {
        self.post_json(&self.submit_url, routes::SUBMIT, request).await
    }
}
