//! Application state for the web layer.

use std::sync::Arc;

use crate::scheduler::ScheduleBackend;
use crate::views::ViewConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Source of route schedules
    pub backend: Arc<ScheduleBackend>,

    /// Presentation settings for all views
    pub views: Arc<ViewConfig>,
}

impl AppState {
    pub fn new(backend: ScheduleBackend, views: ViewConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            views: Arc::new(views),
        }
    }
}
