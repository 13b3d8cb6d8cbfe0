//! Mock scheduler client for running without the route store.
//!
//! Loads route fixtures from JSON files and serves them as if they were
//! live responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use super::convert::schedule_from_value;
use super::error::SchedulerError;
use super::route::{RouteInfo, RouteSchedule};

/// Fixture file layout: `{ "route": {...}, "schedule": {...} }`.
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    route: RouteInfo,
    #[serde(default)]
    schedule: serde_json::Value,
}

/// Mock client that serves route schedules from JSON files.
#[derive(Clone)]
pub struct MockSchedulerClient {
    /// Pre-loaded schedules, keyed by route id (the file stem).
    routes: Arc<RwLock<HashMap<String, Arc<RouteSchedule>>>>,
}

impl MockSchedulerClient {
    /// Create a mock client by loading every `{id}.json` in a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let routes = load_dir(data_dir.as_ref())?;
        Ok(Self {
            routes: Arc::new(RwLock::new(routes)),
        })
    }

    /// Get the schedule for a route.
    pub async fn fetch_route_schedule(
        &self,
        id: &str,
    ) -> Result<Arc<RouteSchedule>, SchedulerError> {
        let routes = self.routes.read().await;
        routes
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::RouteNotFound(id.to_string()))
    }

    /// List the route ids available in the mock data.
    pub async fn available_routes(&self) -> Vec<String> {
        let routes = self.routes.read().await;
        let mut ids: Vec<String> = routes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Reload fixtures from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), SchedulerError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.routes.write().await = fresh;
        Ok(())
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<String, Arc<RouteSchedule>>, SchedulerError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        SchedulerError::NotConfigured(format!("failed to read mock data directory: {e}"))
    })?;

    let mut routes = HashMap::new();

    for entry in entries {
        let path = entry
            .map_err(|e| SchedulerError::NotConfigured(format!("failed to read entry: {e}")))?
            .path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let json = std::fs::read_to_string(&path).map_err(|e| {
            SchedulerError::NotConfigured(format!("failed to read {}: {e}", path.display()))
        })?;
        let fixture: Fixture = serde_json::from_str(&json).map_err(|e| SchedulerError::Json {
            message: format!("{}: {e}", path.display()),
            body: None,
        })?;

        let mut route = fixture.route;
        if route.id.is_none() {
            route.id = Some(id.to_string());
        }
        let schedule = if fixture.schedule.is_null() {
            Default::default()
        } else {
            schedule_from_value(fixture.schedule)?
        };

        routes.insert(id.to_string(), Arc::new(RouteSchedule { route, schedule }));
    }

    if routes.is_empty() {
        return Err(SchedulerError::NotConfigured(format!(
            "no route fixtures found in {}",
            data_dir.display()
        )));
    }

    Ok(routes)
}
