//! Route metadata, used only to label outputs.

use serde::{Deserialize, Serialize};

use crate::domain::ScheduleData;

use super::lenient;

/// Read-only route metadata from the route store.
///
/// Only the terminal names affect the views (they key the timetable
/// directions); everything else is passed through for headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    #[serde(alias = "_id", default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub route_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub route_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub from_terminal: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub to_terminal: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub depot_name: Option<String>,
    #[serde(default)]
    pub is_turnout_from_depot: bool,
}

impl RouteInfo {
    /// Name of the origin terminal, with a placeholder when unknown.
    pub fn origin(&self) -> &str {
        self.from_terminal.as_deref().unwrap_or("Origin")
    }

    /// Name of the destination terminal, with a placeholder when unknown.
    pub fn destination(&self) -> &str {
        self.to_terminal.as_deref().unwrap_or("Destination")
    }
}

/// Route metadata together with its generated schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteSchedule {
    pub route: RouteInfo,
    pub schedule: ScheduleData,
}
