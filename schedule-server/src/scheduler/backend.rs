//! Dispatch between the live route store and local fixtures.

use std::sync::Arc;

use crate::cache::CachedSchedulerClient;

use super::error::SchedulerError;
use super::mock::MockSchedulerClient;
use super::route::RouteSchedule;

/// Where route schedules come from.
pub enum ScheduleBackend {
    /// The route store over HTTP, behind a TTL cache.
    Live(CachedSchedulerClient),
    /// JSON fixtures on disk.
    Mock(MockSchedulerClient),
}

impl ScheduleBackend {
    /// Fetch route metadata and schedule for a route.
    pub async fn fetch_route_schedule(
        &self,
        id: &str,
    ) -> Result<Arc<RouteSchedule>, SchedulerError> {
        match self {
            ScheduleBackend::Live(client) => client.fetch_route_schedule(id).await,
            ScheduleBackend::Mock(client) => client.fetch_route_schedule(id).await,
        }
    }

    /// Short name for start-up logging.
    pub fn describe(&self) -> &'static str {
        match self {
            ScheduleBackend::Live(_) => "live route store",
            ScheduleBackend::Mock(_) => "mock fixtures",
        }
    }
}
