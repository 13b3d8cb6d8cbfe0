//! Schedule events and their kind-specific payloads.

use serde::Serialize;

use super::kind::EventKind;
use super::time::ClockTime;

/// One directional segment of a trip, or the single movement of a depot run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// 1 for outbound (from the route's origin terminal), 2 for return.
    pub leg_number: Option<u32>,
    pub departure_location: Option<String>,
    pub arrival_location: Option<String>,
    pub raw_departure_time: Option<u32>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

impl Leg {
    /// Leg number, falling back to the leg's 0-based `position` in its
    /// trip when the scheduler left it out.
    pub fn number(&self, position: usize) -> u32 {
        self.leg_number
            .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX))
    }

    /// Departure time for display, derived from the raw time if needed.
    pub fn departure_display(&self) -> Option<String> {
        self.departure_time
            .clone()
            .or_else(|| self.raw_departure_time.map(|m| ClockTime::from_minutes(m).to_string()))
    }
}

/// Where and when a crew break happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakInfo {
    pub location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub raw_start_time: Option<u32>,
    pub raw_end_time: Option<u32>,
}

impl BreakInfo {
    /// Start of the break for display.
    pub fn start_display(&self) -> String {
        display_or_raw(self.start_time.as_deref(), self.raw_start_time)
    }

    /// End of the break for display.
    pub fn end_display(&self) -> String {
        display_or_raw(self.end_time.as_deref(), self.raw_end_time)
    }
}

/// One atomic occurrence within a duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub kind: EventKind,
    /// Minutes since midnight; `None` when the scheduler sent something
    /// that is not a time.
    pub raw_time: Option<u32>,
    pub display_time: Option<String>,
    pub trip_number: Option<u32>,
    pub legs: Vec<Leg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<BreakInfo>,
}

impl ScheduleEvent {
    /// Create an event with no payload.
    pub fn new(kind: EventKind, raw_time: Option<u32>, display_time: Option<String>) -> Self {
        Self {
            kind,
            raw_time,
            display_time,
            trip_number: None,
            legs: Vec::new(),
            rest: None,
        }
    }

    /// Sort key; events with a malformed time go last.
    pub fn sort_minutes(&self) -> u32 {
        self.raw_time.unwrap_or(u32::MAX)
    }

    /// Display time, falling back to the raw time, then to an empty string.
    pub fn display(&self) -> String {
        display_or_raw(self.display_time.as_deref(), self.raw_time)
    }

    /// The first leg, if any.
    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }
}

fn display_or_raw(display: Option<&str>, raw: Option<u32>) -> String {
    match (display, raw) {
        (Some(text), _) => text.to_string(),
        (None, Some(minutes)) => ClockTime::from_minutes(minutes).to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_time_sorts_last() {
        let ok = ScheduleEvent::new(EventKind::Trip, Some(1500), None);
        let bad = ScheduleEvent::new(EventKind::Trip, None, None);
        assert!(ok.sort_minutes() < bad.sort_minutes());
    }

    #[test]
    fn display_prefers_text_then_raw() {
        let e = ScheduleEvent::new(EventKind::DutyEnd, Some(600), Some("10:00".into()));
        assert_eq!(e.display(), "10:00");

        let e = ScheduleEvent::new(EventKind::DutyEnd, Some(605), None);
        assert_eq!(e.display(), "10:05");

        let e = ScheduleEvent::new(EventKind::DutyEnd, None, None);
        assert_eq!(e.display(), "");
    }

    #[test]
    fn leg_number_falls_back_to_position() {
        let leg = Leg::default();
        assert_eq!(leg.number(0), 1);
        assert_eq!(leg.number(1), 2);

        let numbered = Leg {
            leg_number: Some(2),
            ..Leg::default()
        };
        assert_eq!(numbered.number(0), 2);
        assert_eq!(leg.departure_display(), None);

        let leg = Leg {
            raw_departure_time: Some(330),
            ..Leg::default()
        };
        assert_eq!(leg.departure_display().as_deref(), Some("05:30"));
    }

    #[test]
    fn break_display_falls_back_to_raw() {
        let rest = BreakInfo {
            start_time: Some("11:00".into()),
            raw_end_time: Some(690),
            ..BreakInfo::default()
        };
        assert_eq!(rest.start_display(), "11:00");
        assert_eq!(rest.end_display(), "11:30");
    }
}
