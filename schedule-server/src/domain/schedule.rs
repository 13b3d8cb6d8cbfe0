//! The converted scheduler payload, before it is flattened into duties.

use serde::Serialize;

use super::duty::ShiftId;
use super::error::ScheduleIssue;
use super::event::ScheduleEvent;

/// Events of one bus within a shift, keyed by the scheduler's bus label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusSchedule {
    pub bus_key: String,
    pub events: Vec<ScheduleEvent>,
}

/// All buses of one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftSchedule {
    pub shift: ShiftId,
    pub buses: Vec<BusSchedule>,
}

/// A complete schedule as produced by the external scheduler.
///
/// Shift and bus order carry no meaning; the views impose their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleData {
    pub shifts: Vec<ShiftSchedule>,
    /// Warnings passed through verbatim from the scheduler.
    pub warnings: Vec<String>,
    /// Problems found while converting the payload.
    pub issues: Vec<ScheduleIssue>,
}

impl ScheduleData {
    /// Whether the schedule has no buses at all.
    pub fn is_empty(&self) -> bool {
        self.shifts.iter().all(|s| s.buses.is_empty())
    }

    /// Iterate every bus schedule along with its shift.
    pub fn buses(&self) -> impl Iterator<Item = (&ShiftId, &BusSchedule)> {
        self.shifts
            .iter()
            .flat_map(|s| s.buses.iter().map(move |b| (&s.shift, b)))
    }
}
