//! Route store and scheduler HTTP client.
//!
//! Route metadata and the generated schedule live behind two endpoints of
//! the same service. Both are needed for every view, so they are fetched
//! concurrently.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::convert::parse_schedule;
use super::error::SchedulerError;
use super::route::{RouteInfo, RouteSchedule};
use super::types::ErrorBody;

/// Default base URL for the route store.
pub const DEFAULT_BASE_URL: &str = "https://tmt-bus-planner.onrender.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// How much of an undecodable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the scheduler client.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Base URL of the route store
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds. Schedule generation runs on request and
    /// can be slow on a cold service.
    pub timeout_secs: u64,
}

impl SchedulerConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 60,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the route store and its schedule endpoint.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl SchedulerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        if config.max_concurrent == 0 {
            return Err(SchedulerError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch route metadata and schedule concurrently.
    pub async fn fetch_route_schedule(&self, id: &str) -> Result<RouteSchedule, SchedulerError> {
        let (route, schedule) =
            futures::try_join!(self.fetch_route(id), self.fetch_schedule_body(id))?;
        let schedule = parse_schedule(&schedule)?;

        debug!(
            route = id,
            shifts = schedule.shifts.len(),
            issues = schedule.issues.len(),
            "fetched route schedule"
        );

        Ok(RouteSchedule { route, schedule })
    }

    /// Fetch route metadata.
    pub async fn fetch_route(&self, id: &str) -> Result<RouteInfo, SchedulerError> {
        let url = format!("{}/api/bus-routes/{}", self.base_url, id);
        let body = self.get(&url, id).await?;

        serde_json::from_str(&body).map_err(|e| SchedulerError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }

    /// Fetch the raw schedule body for a route.
    async fn fetch_schedule_body(&self, id: &str) -> Result<String, SchedulerError> {
        let url = format!("{}/api/bus-routes/{}/schedule", self.base_url, id);
        self.get(&url, id).await
    }

    /// GET a URL and return its body, mapping error statuses.
    async fn get(&self, url: &str, id: &str) -> Result<String, SchedulerError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SchedulerError::NotConfigured("semaphore closed".to_string()))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SchedulerError::RouteNotFound(id.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            warn!(url, status = status.as_u16(), %message, "route store request failed");
            return Err(SchedulerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

/// Pull the `message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.chars().take(BODY_SNIPPET_CHARS).collect())
}
