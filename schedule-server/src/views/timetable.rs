//! Public timetable: departures per direction in service order.
//!
//! A day's service reads from the anchor bus's first departure onward and
//! wraps past midnight back to clock times that are earlier but logically
//! later in service. Departures are read straight from the trip legs of the
//! converted schedule, independent of duty grouping.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::domain::{BusLabel, EventKind, ScheduleData};

use super::config::ViewConfig;

/// One trip-leg departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub raw_departure_time: Option<u32>,
    /// `HH:MM`
    pub time: String,
    /// Short bus label ("Bus 3", "Gen 1").
    pub bus: String,
    pub leg_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub time: String,
    pub bus: String,
}

/// Departures from one terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Direction {
    pub from: String,
    pub to: String,
    pub leg_number: u32,
    pub entries: Vec<TimetableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timetable {
    pub directions: Vec<Direction>,
}

/// Every trip-leg departure in the schedule. Legs with no departure time
/// are skipped.
pub fn extract_departures(data: &ScheduleData) -> Vec<Departure> {
    let mut departures = Vec::new();

    for (shift, bus) in data.buses() {
        let label = BusLabel::parse(&bus.bus_key).short();
        for event in bus.events.iter().filter(|e| e.kind == EventKind::Trip) {
            for (position, leg) in event.legs.iter().enumerate() {
                let leg_number = leg.number(position);
                match leg.departure_display().filter(|t| !t.is_empty()) {
                    Some(time) => departures.push(Departure {
                        raw_departure_time: leg.raw_departure_time,
                        time,
                        bus: label.clone(),
                        leg_number,
                    }),
                    None => debug!(
                        %shift,
                        bus = %label,
                        trip = ?event.trip_number,
                        leg = leg_number,
                        "trip leg has no departure time"
                    ),
                }
            }
        }
    }

    departures
}

/// Order one direction's departures starting from the anchor bus.
///
/// Entries with the same time and bus collapse to the first. The anchor is
/// the first entry of `anchor_bus` in service order (raw minutes, which run
/// past 1440 after midnight, else clock text); everything at or after its time
/// follows it in time order, then everything before it. Without an anchor
/// entry the result is plain time order.
///
/// # Examples
///
/// ```
/// use schedule_server::views::{Departure, wrap_around_sort};
///
/// let dep = |time: &str, bus: &str| Departure {
///     raw_departure_time: None,
///     time: time.to_string(),
///     bus: bus.to_string(),
///     leg_number: 1,
/// };
/// let sorted = wrap_around_sort(
///     vec![dep("05:00", "Bus 2"), dep("06:00", "Bus 1"), dep("07:00", "Bus 2")],
///     "Bus 1",
/// );
/// let times: Vec<&str> = sorted.iter().map(|e| e.time.as_str()).collect();
/// assert_eq!(times, vec!["06:00", "07:00", "05:00"]);
/// ```
pub fn wrap_around_sort(entries: Vec<Departure>, anchor_bus: &str) -> Vec<TimetableEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<Departure> = entries
        .into_iter()
        .filter(|d| seen.insert((d.time.clone(), d.bus.clone())))
        .collect();

    let anchor = entries
        .iter()
        .enumerate()
        .filter(|(_, d)| d.bus == anchor_bus)
        .min_by(|(_, a), (_, b)| service_order(a).cmp(&service_order(b)))
        .map(|(i, _)| i);

    let by_time = |a: &Departure, b: &Departure| a.time.cmp(&b.time).then_with(|| a.bus.cmp(&b.bus));

    let Some(anchor) = anchor else {
        entries.sort_by(by_time);
        return entries.into_iter().map(TimetableEntry::from).collect();
    };

    let anchor = entries.remove(anchor);
    let (mut after, mut before): (Vec<Departure>, Vec<Departure>) =
        entries.into_iter().partition(|d| d.time >= anchor.time);
    after.sort_by(by_time);
    before.sort_by(by_time);

    std::iter::once(anchor)
        .chain(after)
        .chain(before)
        .map(TimetableEntry::from)
        .collect()
}

/// Entries with raw minutes come first, ordered by them; the rest by text.
fn service_order(d: &Departure) -> (bool, Option<u32>, &str) {
    (d.raw_departure_time.is_none(), d.raw_departure_time, &d.time)
}

/// Build both directions of the timetable. Leg 1 departs from `origin`,
/// leg 2 from `destination`; other leg numbers are not shown.
pub fn build_timetable(
    data: &ScheduleData,
    origin: &str,
    destination: &str,
    config: &ViewConfig,
) -> Timetable {
    let (outbound, rest): (Vec<Departure>, Vec<Departure>) = extract_departures(data)
        .into_iter()
        .partition(|d| d.leg_number == 1);
    let inbound: Vec<Departure> = rest.into_iter().filter(|d| d.leg_number == 2).collect();

    Timetable {
        directions: vec![
            Direction {
                from: origin.to_string(),
                to: destination.to_string(),
                leg_number: 1,
                entries: wrap_around_sort(outbound, &config.anchor_bus),
            },
            Direction {
                from: destination.to_string(),
                to: origin.to_string(),
                leg_number: 2,
                entries: wrap_around_sort(inbound, &config.anchor_bus),
            },
        ],
    }
}

impl From<Departure> for TimetableEntry {
    fn from(d: Departure) -> Self {
        TimetableEntry {
            time: d.time,
            bus: d.bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusSchedule, Leg, ScheduleEvent, ShiftId, ShiftSchedule};

    fn dep(time: &str, bus: &str) -> Departure {
        Departure {
            raw_departure_time: None,
            time: time.to_string(),
            bus: bus.to_string(),
            leg_number: 1,
        }
    }

    fn pairs(entries: &[TimetableEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.time.as_str(), e.bus.as_str()))
            .collect()
    }

    fn trip(legs: &[(u32, Option<&str>)]) -> ScheduleEvent {
        let mut e = ScheduleEvent::new(EventKind::Trip, Some(0), None);
        e.trip_number = Some(1);
        e.legs = legs
            .iter()
            .map(|(n, time)| Leg {
                leg_number: Some(*n),
                departure_time: time.map(str::to_string),
                ..Leg::default()
            })
            .collect();
        e
    }

    fn schedule(buses: Vec<(&str, Vec<ScheduleEvent>)>) -> ScheduleData {
        ScheduleData {
            shifts: vec![ShiftSchedule {
                shift: ShiftId::new("S1"),
                buses: buses
                    .into_iter()
                    .map(|(bus, events)| BusSchedule {
                        bus_key: bus.to_string(),
                        events,
                    })
                    .collect(),
            }],
            ..ScheduleData::default()
        }
    }

    #[test]
    fn wraps_around_the_anchor() {
        let sorted = wrap_around_sort(
            vec![
                dep("23:30", "Bus 2"),
                dep("00:15", "Bus 3"),
                dep("05:00", "Bus 1"),
                dep("04:45", "Bus 2"),
                dep("05:10", "Bus 2"),
                dep("09:00", "Bus 1"),
            ],
            "Bus 1",
        );

        assert_eq!(
            pairs(&sorted),
            vec![
                ("05:00", "Bus 1"),
                ("05:10", "Bus 2"),
                ("09:00", "Bus 1"),
                ("23:30", "Bus 2"),
                ("00:15", "Bus 3"),
                ("04:45", "Bus 2"),
            ]
        );
    }

    #[test]
    fn anchor_ignores_anchor_bus_trips_past_midnight() {
        let at = |time: &str, bus: &str, raw: u32| Departure {
            raw_departure_time: Some(raw),
            ..dep(time, bus)
        };
        let sorted = wrap_around_sort(
            vec![
                at("05:00", "Bus 1", 300),
                at("05:30", "Bus 2", 330),
                at("00:15", "Bus 1", 1455),
                at("00:00", "Bus 2", 1440),
            ],
            "Bus 1",
        );

        assert_eq!(
            pairs(&sorted),
            vec![
                ("05:00", "Bus 1"),
                ("05:30", "Bus 2"),
                ("00:00", "Bus 2"),
                ("00:15", "Bus 1"),
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let sorted = wrap_around_sort(
            vec![
                dep("06:00", "Bus 1"),
                dep("06:00", "Bus 1"),
                dep("06:00", "Bus 2"),
            ],
            "Bus 1",
        );
        assert_eq!(pairs(&sorted), vec![("06:00", "Bus 1"), ("06:00", "Bus 2")]);
    }

    #[test]
    fn entry_sharing_anchor_time_follows_anchor() {
        let sorted = wrap_around_sort(
            vec![dep("06:00", "Bus 0"), dep("06:00", "Bus 1"), dep("05:00", "Bus 3")],
            "Bus 1",
        );
        assert_eq!(
            pairs(&sorted),
            vec![("06:00", "Bus 1"), ("06:00", "Bus 0"), ("05:00", "Bus 3")]
        );
    }

    #[test]
    fn missing_anchor_falls_back_to_time_order() {
        let sorted = wrap_around_sort(
            vec![dep("09:00", "Bus 2"), dep("05:00", "Bus 3"), dep("05:00", "Bus 2")],
            "Bus 1",
        );
        assert_eq!(
            pairs(&sorted),
            vec![("05:00", "Bus 2"), ("05:00", "Bus 3"), ("09:00", "Bus 2")]
        );
    }

    #[test]
    fn empty_input() {
        assert!(wrap_around_sort(Vec::new(), "Bus 1").is_empty());
        let table = build_timetable(&ScheduleData::default(), "A", "B", &ViewConfig::default());
        assert_eq!(table.directions.len(), 2);
        assert!(table.directions.iter().all(|d| d.entries.is_empty()));
    }

    #[test]
    fn extraction_skips_legs_without_departure() {
        let data = schedule(vec![
            ("Bus 1", vec![trip(&[(1, Some("05:30")), (2, None)])]),
            ("General 2", vec![trip(&[(2, Some("06:10"))])]),
        ]);
        let departures = extract_departures(&data);

        assert_eq!(
            departures,
            vec![
                Departure {
                    raw_departure_time: None,
                    time: "05:30".into(),
                    bus: "Bus 1".into(),
                    leg_number: 1
                },
                Departure {
                    raw_departure_time: None,
                    time: "06:10".into(),
                    bus: "Gen 2".into(),
                    leg_number: 2
                },
            ]
        );
    }

    #[test]
    fn directions_split_by_leg() {
        let data = schedule(vec![
            ("Bus 1", vec![trip(&[(1, Some("05:30")), (2, Some("06:20"))])]),
            ("Bus 2", vec![trip(&[(1, Some("05:45")), (2, Some("06:35")), (3, Some("07:00"))])]),
        ]);
        let table = build_timetable(&data, "Thane", "Borivali", &ViewConfig::default());

        let outbound = &table.directions[0];
        assert_eq!((outbound.from.as_str(), outbound.to.as_str()), ("Thane", "Borivali"));
        assert_eq!(
            pairs(&outbound.entries),
            vec![("05:30", "Bus 1"), ("05:45", "Bus 2")]
        );

        let inbound = &table.directions[1];
        assert_eq!(inbound.from, "Borivali");
        assert_eq!(
            pairs(&inbound.entries),
            vec![("06:20", "Bus 1"), ("06:35", "Bus 2")]
        );
    }

    #[test]
    fn unnumbered_return_leg_runs_inbound() {
        let mut round = trip(&[(1, Some("05:30")), (2, Some("06:10"))]);
        for leg in &mut round.legs {
            leg.leg_number = None;
        }
        let data = schedule(vec![("Bus 1", vec![round])]);
        let table = build_timetable(&data, "Thane", "Borivali", &ViewConfig::default());

        assert_eq!(pairs(&table.directions[0].entries), vec![("05:30", "Bus 1")]);
        assert_eq!(pairs(&table.directions[1].entries), vec![("06:10", "Bus 1")]);
    }

    #[test]
    fn anchor_bus_is_configurable() {
        let data = schedule(vec![
            ("Bus 1", vec![trip(&[(1, Some("05:30"))])]),
            ("Bus 2", vec![trip(&[(1, Some("07:45"))])]),
        ]);
        let config = ViewConfig::default().with_anchor_bus("Bus 2");
        let table = build_timetable(&data, "A", "B", &config);

        assert_eq!(
            pairs(&table.directions[0].entries),
            vec![("07:45", "Bus 2"), ("05:30", "Bus 1")]
        );
    }

    #[test]
    fn non_trip_events_are_ignored() {
        let mut depot = ScheduleEvent::new(EventKind::TripToDepot, Some(900), None);
        depot.legs = vec![Leg {
            departure_time: Some("15:00".into()),
            ..Leg::default()
        }];
        let data = schedule(vec![("Bus 1", vec![depot])]);
        assert!(extract_departures(&data).is_empty());
    }
}
