//! Conversion from scheduler DTOs to domain types.
//!
//! Conversion never fails on values: malformed times, unknown kinds and
//! missing legs are carried through in degraded form and recorded as
//! [`ScheduleIssue`]s. Only JSON whose outer shape is wrong is rejected,
//! and that happens while decoding, before conversion starts.

use tracing::debug;

use crate::domain::{
    BreakInfo, BusLabel, BusSchedule, DutyId, EventKind, Leg, ScheduleData, ScheduleEvent,
    ScheduleIssue, ShiftId, ShiftSchedule,
};

use super::types::{RawEvent, RawLeg, SchedulePayload};

/// Error decoding a scheduler payload.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The payload does not have the shift → bus → events shape.
    #[error("malformed schedule payload: {0}")]
    Shape(String),
}

/// Decode and convert a schedule payload from JSON text.
pub fn parse_schedule(json: &str) -> Result<ScheduleData, ConversionError> {
    let payload: SchedulePayload =
        serde_json::from_str(json).map_err(|e| ConversionError::Shape(e.to_string()))?;
    Ok(convert_schedule(payload))
}

/// Decode and convert a schedule payload from an already-parsed JSON value.
pub fn schedule_from_value(value: serde_json::Value) -> Result<ScheduleData, ConversionError> {
    let payload: SchedulePayload =
        serde_json::from_value(value).map_err(|e| ConversionError::Shape(e.to_string()))?;
    Ok(convert_schedule(payload))
}

/// Convert a decoded payload to domain types.
pub fn convert_schedule(payload: SchedulePayload) -> ScheduleData {
    let mut issues = Vec::new();

    let shifts = payload
        .schedules
        .unwrap_or_default()
        .into_iter()
        .map(|(shift_key, buses)| {
            let shift = ShiftId::new(shift_key);
            let buses = buses
                .unwrap_or_default()
                .into_iter()
                .map(|(bus_key, events)| {
                    let duty = DutyId::new(BusLabel::parse(&bus_key), shift.clone());
                    let events = events
                        .unwrap_or_default()
                        .into_iter()
                        .map(|raw| convert_event(raw, &duty, &mut issues))
                        .collect();
                    BusSchedule { bus_key, events }
                })
                .collect();
            ShiftSchedule { shift, buses }
        })
        .collect();

    if !issues.is_empty() {
        debug!(count = issues.len(), "schedule payload has data issues");
    }

    ScheduleData {
        shifts,
        warnings: payload.warnings,
        issues,
    }
}

/// Convert one event, recording any data issues against `duty`.
fn convert_event(raw: RawEvent, duty: &DutyId, issues: &mut Vec<ScheduleIssue>) -> ScheduleEvent {
    let kind = match raw.kind.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => EventKind::parse(name),
        _ => EventKind::Unknown("Unknown".to_string()),
    };

    if let EventKind::Unknown(name) = &kind {
        issues.push(ScheduleIssue::unknown_kind(duty, name));
    }
    if raw.raw_time.is_none() {
        issues.push(ScheduleIssue::malformed_time(duty, kind.clone()));
    }

    let mut legs: Vec<Leg> = raw.legs.into_iter().map(convert_leg).collect();

    // Depot runs from older schedulers carry their movement on the event.
    if kind.is_depot_run()
        && legs.is_empty()
        && (raw.departure_time.is_some() || raw.raw_departure_time.is_some())
    {
        legs.push(Leg {
            leg_number: Some(1),
            departure_location: raw.departure_location,
            arrival_location: raw.arrival_location,
            raw_departure_time: raw.raw_departure_time,
            departure_time: raw.departure_time,
            arrival_time: raw.arrival_time,
        });
    }

    let rest = (kind == EventKind::Break).then(|| BreakInfo {
        location: raw.location,
        start_time: raw.start_time,
        end_time: raw.end_time,
        raw_start_time: raw.raw_start_time.or(raw.raw_time),
        raw_end_time: raw.raw_end_time,
    });

    ScheduleEvent {
        kind,
        raw_time: raw.raw_time,
        display_time: raw.time,
        trip_number: raw.trip_number,
        legs,
        rest,
    }
}

fn convert_leg(raw: RawLeg) -> Leg {
    Leg {
        leg_number: raw.leg_number,
        departure_location: raw.departure_location,
        arrival_location: raw.arrival_location,
        raw_departure_time: raw.raw_departure_time,
        departure_time: raw.departure_time,
        arrival_time: raw.arrival_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_nested_schedule() {
        let json = r#"{
            "schedules": {
                "S2": {"Bus 3": [{"type": "Calling Time", "time": "13:00", "rawTime": 780}]},
                "S1": {
                    "Bus 1": [
                        {"type": "Trip", "tripNumber": 1, "rawTime": 330, "legs": [
                            {"legNumber": 1, "departureTime": "05:30"},
                            {"legNumber": 2, "departureTime": "06:20"}
                        ]}
                    ],
                    "Bus 2": []
                }
            }
        }"#;
        let data = parse_schedule(json).unwrap();

        assert_eq!(data.shifts.len(), 2);
        assert_eq!(data.shifts[0].shift.as_str(), "S1");
        assert_eq!(data.shifts[0].buses.len(), 2);
        assert!(data.shifts[0].buses[1].events.is_empty());

        let trip = &data.shifts[0].buses[0].events[0];
        assert_eq!(trip.kind, EventKind::Trip);
        assert_eq!(trip.trip_number, Some(1));
        assert_eq!(trip.legs.len(), 2);
        assert_eq!(trip.legs[1].departure_time.as_deref(), Some("06:20"));
        assert!(data.issues.is_empty());
    }

    #[test]
    fn records_malformed_time_and_unknown_kind() {
        let json = r#"{"schedules": {"S1": {"Bus 1": [
            {"type": "Refuel", "rawTime": 400},
            {"type": "Duty End", "rawTime": "late"}
        ]}}}"#;
        let data = parse_schedule(json).unwrap();

        let events = &data.shifts[0].buses[0].events;
        assert_eq!(events[0].kind, EventKind::Unknown("Refuel".into()));
        assert_eq!(events[1].raw_time, None);
        assert_eq!(data.issues.len(), 2);
        assert!(matches!(
            data.issues[0],
            ScheduleIssue::UnknownEventKind { .. }
        ));
        assert!(matches!(data.issues[1], ScheduleIssue::MalformedTime { .. }));
    }

    #[test]
    fn depot_run_fields_become_a_leg() {
        let json = r#"{"schedules": {"S1": {"Bus 1": [
            {"type": "Trip to Depot", "rawTime": 900, "time": "15:00",
             "departureTime": "15:00", "arrivalTime": "15:25"}
        ]}}}"#;
        let data = parse_schedule(json).unwrap();

        let event = &data.shifts[0].buses[0].events[0];
        assert_eq!(event.legs.len(), 1);
        assert_eq!(event.legs[0].departure_time.as_deref(), Some("15:00"));
        assert_eq!(event.legs[0].arrival_time.as_deref(), Some("15:25"));
    }

    #[test]
    fn break_payload_is_kept() {
        let json = r#"{"schedules": {"S1": {"Bus 1": [
            {"type": "Break", "rawTime": 600, "location": "Depot",
             "startTime": "10:00", "endTime": "10:30"}
        ]}}}"#;
        let data = parse_schedule(json).unwrap();

        let rest = data.shifts[0].buses[0].events[0].rest.as_ref().unwrap();
        assert_eq!(rest.location.as_deref(), Some("Depot"));
        assert_eq!(rest.raw_start_time, Some(600));
        assert_eq!(rest.end_display(), "10:30");
    }

    #[test]
    fn missing_kind_is_unknown() {
        let data = parse_schedule(r#"{"schedules": {"S1": {"Bus 1": [{"rawTime": 1}]}}}"#).unwrap();
        assert_eq!(
            data.shifts[0].buses[0].events[0].kind,
            EventKind::Unknown("Unknown".into())
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        let data = parse_schedule("{}").unwrap();
        assert!(data.is_empty());
        assert!(data.shifts.is_empty());

        let data = parse_schedule(r#"{"schedules": {"S1": null}}"#).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let err = parse_schedule(r#"{"schedules": "none"}"#).unwrap_err();
        assert!(err.to_string().starts_with("malformed schedule payload"));
        assert!(parse_schedule("not json").is_err());
    }
}
