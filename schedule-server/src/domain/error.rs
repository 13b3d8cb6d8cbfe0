//! Data quality issues found while reshaping a schedule.
//!
//! None of these abort a computation. They are collected alongside the
//! output so callers can surface them, and the affected data is degraded
//! (sorted last, rendered blank, or left out of the duty board).

use serde::Serialize;

use super::duty::DutyId;
use super::kind::EventKind;

/// A non-fatal problem with the scheduler's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum ScheduleIssue {
    /// A duty has no Calling Time or no Duty End, so no board row or
    /// shift length can be derived for it.
    #[error("{duty} has no {kind} event")]
    MissingRequiredEvent { duty: String, kind: EventKind },

    /// A raw time was absent or not a number.
    #[error("{duty}: {kind} event has a malformed time")]
    MalformedTime { duty: String, kind: EventKind },

    /// The scheduler sent an event kind outside the known catalog.
    #[error("{duty}: unknown event kind \"{kind}\"")]
    UnknownEventKind { duty: String, kind: String },
}

impl ScheduleIssue {
    pub fn missing(duty: &DutyId, kind: EventKind) -> Self {
        ScheduleIssue::MissingRequiredEvent {
            duty: duty.to_string(),
            kind,
        }
    }

    pub fn malformed_time(duty: &DutyId, kind: EventKind) -> Self {
        ScheduleIssue::MalformedTime {
            duty: duty.to_string(),
            kind,
        }
    }

    pub fn unknown_kind(duty: &DutyId, kind: &str) -> Self {
        ScheduleIssue::UnknownEventKind {
            duty: duty.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusLabel, ShiftId};

    fn duty() -> DutyId {
        DutyId::new(BusLabel::parse("Bus 2"), ShiftId::new("S1"))
    }

    #[test]
    fn error_display() {
        let issue = ScheduleIssue::missing(&duty(), EventKind::DutyEnd);
        assert_eq!(issue.to_string(), "Bus 2 - S1 has no Duty End event");

        let issue = ScheduleIssue::malformed_time(&duty(), EventKind::Trip);
        assert_eq!(issue.to_string(), "Bus 2 - S1: Trip event has a malformed time");

        let issue = ScheduleIssue::unknown_kind(&duty(), "Refuel");
        assert_eq!(
            issue.to_string(),
            "Bus 2 - S1: unknown event kind \"Refuel\""
        );
    }

    #[test]
    fn serializes_with_tag() {
        let issue = ScheduleIssue::missing(&duty(), EventKind::CallingTime);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["issue"], "missingRequiredEvent");
        assert_eq!(json["kind"], "Calling Time");
    }
}
