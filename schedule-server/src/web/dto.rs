//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::ScheduleIssue;
use crate::scheduler::RouteInfo;
use crate::views::{DutyBoard, PivotTable, Timetable};

/// Event-by-duty grid for a route.
#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub route: RouteInfo,
    /// Scheduler warnings, passed through verbatim.
    pub warnings: Vec<String>,
    /// Data problems found in the schedule.
    pub issues: Vec<ScheduleIssue>,
    pub grid: PivotTable,
}

/// Duty board for a route.
#[derive(Debug, Serialize)]
pub struct DutyBoardResponse {
    pub route: RouteInfo,
    pub warnings: Vec<String>,
    pub issues: Vec<ScheduleIssue>,
    pub board: DutyBoard,
}

/// Public timetable for a route.
#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub route: RouteInfo,
    pub warnings: Vec<String>,
    pub timetable: Timetable,
}

/// A schedule supplied by the caller instead of fetched from the store.
#[derive(Debug, Deserialize)]
pub struct ViewsRequest {
    #[serde(default)]
    pub route: RouteInfo,

    /// Scheduler output: `{ "schedules": {...}, "warnings": [...] }`
    #[serde(default)]
    pub schedule: serde_json::Value,
}

/// All three views at once.
#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub route: RouteInfo,
    pub warnings: Vec<String>,
    pub issues: Vec<ScheduleIssue>,
    pub grid: PivotTable,
    pub board: DutyBoard,
    pub timetable: Timetable,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
