//! Scheduler response DTOs.
//!
//! These types map directly onto the scheduler's JSON. The outer shape
//! (shift → bus → event list) is strict: if it is wrong the payload is
//! rejected. Everything inside an event is optional and decoded leniently.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::lenient;

/// Response from `GET /api/bus-routes/{id}/schedule`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePayload {
    /// shift id → bus label → events. A missing key means no schedule.
    #[serde(default)]
    pub schedules: Option<BTreeMap<String, Option<BTreeMap<String, Option<Vec<RawEvent>>>>>>,

    /// Human-readable warnings from the scheduler.
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub warnings: Vec<String>,
}

/// One event as sent by the scheduler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Event kind, e.g. "Calling Time" or "Trip".
    #[serde(rename = "type", alias = "kind", default, deserialize_with = "lenient::text")]
    pub kind: Option<String>,

    /// Minutes since midnight.
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub raw_time: Option<u32>,

    /// "HH:MM" display time.
    #[serde(alias = "displayTime", default, deserialize_with = "lenient::text")]
    pub time: Option<String>,

    /// Trip number (Trip only).
    #[serde(default, deserialize_with = "lenient::number")]
    pub trip_number: Option<u32>,

    /// Trip legs, or the single movement of a depot run.
    #[serde(default, deserialize_with = "lenient::list")]
    pub legs: Vec<RawLeg>,

    /// Break location (Break only).
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub start_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub end_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub raw_start_time: Option<u32>,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub raw_end_time: Option<u32>,

    /// Event-level movement fields. Older scheduler versions put depot
    /// runs here instead of in a leg.
    #[serde(default, deserialize_with = "lenient::text")]
    pub departure_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub arrival_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub raw_departure_time: Option<u32>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub departure_location: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub arrival_location: Option<String>,
}

/// One leg of a trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    #[serde(default, deserialize_with = "lenient::number")]
    pub leg_number: Option<u32>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub departure_location: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub arrival_location: Option<String>,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub raw_departure_time: Option<u32>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub departure_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub arrival_time: Option<String>,
}

/// Error body returned by the route store on failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_payload() {
        let json = r#"{
            "schedules": {
                "S1": {
                    "Bus 1": [
                        {"type": "Calling Time", "time": "05:00", "rawTime": 300},
                        {"type": "Trip", "tripNumber": 1, "rawTime": 330, "legs": [
                            {"legNumber": 1, "departureLocation": "A", "arrivalLocation": "B",
                             "rawDepartureTime": 330, "departureTime": "05:30", "arrivalTime": "06:10"}
                        ]},
                        {"type": "Break", "location": "B", "startTime": "09:00", "endTime": "09:30", "rawTime": 540}
                    ],
                    "Bus 2": null
                }
            },
            "warnings": ["Bus 2 has no trips"]
        }"#;
        let payload: SchedulePayload = serde_json::from_str(json).unwrap();
        let schedules = payload.schedules.unwrap();
        let s1 = schedules["S1"].as_ref().unwrap();
        let bus1 = s1["Bus 1"].as_ref().unwrap();
        assert_eq!(bus1.len(), 3);
        assert_eq!(bus1[1].legs[0].departure_time.as_deref(), Some("05:30"));
        assert_eq!(bus1[2].location.as_deref(), Some("B"));
        assert!(s1["Bus 2"].is_none());
        assert_eq!(payload.warnings, vec!["Bus 2 has no trips".to_string()]);
    }

    #[test]
    fn accepts_spec_style_field_names() {
        let json = r#"{"kind": "DutyEnd", "displayTime": "13:15", "rawTime": "795"}"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind.as_deref(), Some("DutyEnd"));
        assert_eq!(event.time.as_deref(), Some("13:15"));
        assert_eq!(event.raw_time, Some(795));
    }

    #[test]
    fn malformed_legs_degrade_to_empty() {
        let json = r#"{"type": "Trip", "legs": "none"}"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert!(event.legs.is_empty());
    }

    #[test]
    fn empty_payload_is_allowed() {
        let payload: SchedulePayload = serde_json::from_str("{}").unwrap();
        assert!(payload.schedules.is_none());
        assert!(payload.warnings.is_empty());
    }

    #[test]
    fn wrong_outer_shape_is_rejected() {
        assert!(serde_json::from_str::<SchedulePayload>(r#"{"schedules": [1, 2]}"#).is_err());
        assert!(
            serde_json::from_str::<SchedulePayload>(r#"{"schedules": {"S1": {"Bus 1": 5}}}"#)
                .is_err()
        );
    }
}
