//! Event-by-duty pivot grid.
//!
//! One row per distinct derived label across all duties, one column per
//! duty. Rows are shared column-wide: every duty that has a Calling Time
//! fills a cell in the single "Calling Time" row.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{DutyId, EventKind, Leg, ScheduleEvent};

use super::collect::{ColumnGroup, DutyCollection};
use super::config::{BreakCellStyle, ViewConfig};

/// Identity of a grid row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKey {
    /// One shared row per kind (every kind except Trip and Break).
    Kind(EventKind),
    /// One row per break location.
    Break { location: Option<String> },
    /// One row per (trip, leg) pair. A missing trip number is trip 0.
    #[serde(rename_all = "camelCase")]
    TripLeg { trip_number: u32, leg_number: u32 },
}

/// Ordering key of a row: priority, then earliest raw time, then trip and
/// leg. Missing times sort as `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSortKey {
    pub priority: u8,
    pub raw_time: u32,
    pub trip_number: u32,
    pub leg_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLabel {
    pub key: RowKey,
    pub display_text: String,
    pub sort_key: RowSortKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub label: RowLabel,
    /// One cell per column; `None` where the duty has no such event.
    pub cells: Vec<Option<String>>,
}

/// The grid: two header rows (groups, then duties) and the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    pub column_groups: Vec<ColumnGroup>,
    pub columns: Vec<DutyId>,
    pub rows: Vec<PivotRow>,
}

/// One event's contribution to one row.
struct Contribution {
    key: RowKey,
    display_text: String,
    time: u32,
    trip_number: u32,
    leg_number: u32,
    text: String,
}

/// A row under construction. Cells remember the time of the event that
/// filled them so the earliest event wins.
struct RowBuilder {
    key: RowKey,
    display_text: String,
    sort_key: RowSortKey,
    cells: Vec<Option<(u32, String)>>,
}

/// Build the pivot grid for a duty collection.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::ScheduleData;
/// use schedule_server::views::{ViewConfig, build_pivot, collect_duties};
///
/// let config = ViewConfig::default();
/// let grid = build_pivot(&collect_duties(&ScheduleData::default(), &config), &config);
/// assert!(grid.rows.is_empty());
/// assert!(grid.columns.is_empty());
/// ```
pub fn build_pivot(collection: &DutyCollection, config: &ViewConfig) -> PivotTable {
    let columns: Vec<DutyId> = collection.duties().map(|d| d.id.clone()).collect();
    let width = columns.len();

    let mut rows: Vec<RowBuilder> = Vec::new();
    let mut index: HashMap<RowKey, usize> = HashMap::new();

    for (col, duty) in collection.duties().enumerate() {
        for event in &duty.events {
            for c in contributions(event, config.break_cell_style) {
                let i = *index.entry(c.key.clone()).or_insert_with(|| {
                    rows.push(RowBuilder {
                        key: c.key.clone(),
                        display_text: c.display_text.clone(),
                        sort_key: RowSortKey {
                            priority: event.kind.priority(),
                            raw_time: c.time,
                            trip_number: c.trip_number,
                            leg_number: c.leg_number,
                        },
                        cells: vec![None; width],
                    });
                    rows.len() - 1
                });

                let row = &mut rows[i];
                row.sort_key.raw_time = row.sort_key.raw_time.min(c.time);

                let cell = &mut row.cells[col];
                if cell.as_ref().is_none_or(|(t, _)| c.time < *t) {
                    *cell = Some((c.time, c.text));
                }
            }
        }
    }

    rows.sort_by_key(|r| r.sort_key);

    PivotTable {
        column_groups: collection.column_groups(),
        columns,
        rows: rows
            .into_iter()
            .map(|r| PivotRow {
                label: RowLabel {
                    key: r.key,
                    display_text: r.display_text,
                    sort_key: r.sort_key,
                },
                cells: r.cells.into_iter().map(|c| c.map(|(_, text)| text)).collect(),
            })
            .collect(),
    }
}

/// The rows an event contributes to. Every event contributes at least one.
fn contributions(event: &ScheduleEvent, style: BreakCellStyle) -> Vec<Contribution> {
    let time = event.sort_minutes();

    match &event.kind {
        EventKind::Trip => trip_contributions(event),
        EventKind::Break => {
            let location = event
                .rest
                .as_ref()
                .and_then(|r| r.location.clone())
                .filter(|l| !l.trim().is_empty());
            let display_text = match &location {
                Some(loc) => format!("Break @ {loc}"),
                None => "Break".to_string(),
            };
            let text = match &event.rest {
                Some(rest) => style.render(&rest.start_display(), &rest.end_display()),
                None => event.display(),
            };
            vec![Contribution {
                key: RowKey::Break { location },
                display_text,
                time,
                trip_number: 0,
                leg_number: 0,
                text,
            }]
        }
        kind => {
            let text = if kind.is_depot_run() {
                event
                    .first_leg()
                    .map(movement_text)
                    .unwrap_or_else(|| event.display())
            } else {
                event.display()
            };
            vec![Contribution {
                key: RowKey::Kind(kind.clone()),
                display_text: kind.name().to_string(),
                time,
                trip_number: 0,
                leg_number: 0,
                text,
            }]
        }
    }
}

fn trip_contributions(event: &ScheduleEvent) -> Vec<Contribution> {
    let trip_number = event.trip_number.unwrap_or(0);
    let trip_label = match event.trip_number {
        Some(n) => format!("Trip {n}"),
        None => "Trip".to_string(),
    };

    if event.legs.is_empty() {
        return vec![Contribution {
            key: RowKey::TripLeg {
                trip_number,
                leg_number: 1,
            },
            display_text: trip_label,
            time: event.sort_minutes(),
            trip_number,
            leg_number: 1,
            text: event.display(),
        }];
    }

    event
        .legs
        .iter()
        .enumerate()
        .map(|(position, leg)| {
            let leg_number = leg.number(position);
            let display_text = match leg.departure_location.as_deref().map(str::trim) {
                Some(loc) if !loc.is_empty() => format!("{trip_label} {loc}"),
                _ => format!("{trip_label} leg {leg_number}"),
            };
            Contribution {
                key: RowKey::TripLeg {
                    trip_number,
                    leg_number,
                },
                display_text,
                time: leg.raw_departure_time.unwrap_or(event.sort_minutes()),
                trip_number,
                leg_number,
                text: leg.departure_display().unwrap_or_else(|| event.display()),
            }
        })
        .collect()
}

/// "{departure} to {arrival}", or just the departure when arrival is unknown.
fn movement_text(leg: &Leg) -> String {
    let departure = leg.departure_display().unwrap_or_default();
    match leg.arrival_time.as_deref() {
        Some(arrival) if !arrival.is_empty() => format!("{departure} to {arrival}"),
        _ => departure,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{BusSchedule, ScheduleData, ShiftId, ShiftSchedule};
    use crate::views::collect_duties;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn kind_strategy() -> impl Strategy<Value = EventKind> {
        prop_oneof![
            Just(EventKind::CallingTime),
            Just(EventKind::Preparation),
            Just(EventKind::DepotMovement),
            Just(EventKind::Trip),
            Just(EventKind::Break),
            Just(EventKind::TripToDepot),
            Just(EventKind::CheckingTime),
            Just(EventKind::DutyEnd),
            Just(EventKind::Unknown("Refuel".to_string())),
        ]
    }

    fn event_strategy() -> impl Strategy<Value = ScheduleEvent> {
        (
            kind_strategy(),
            prop::option::of(0u32..1440),
            1u32..5,
            1u32..3,
            prop::sample::select(vec!["Thane", "Depot"]),
        )
            .prop_map(|(kind, raw, trip, legs, location)| {
                let mut e = ScheduleEvent::new(kind.clone(), raw, None);
                match kind {
                    EventKind::Trip => {
                        e.trip_number = Some(trip);
                        e.legs = (1..=legs)
                            .map(|n| Leg {
                                leg_number: Some(n),
                                raw_departure_time: raw.map(|r| r + n * 30),
                                ..Leg::default()
                            })
                            .collect();
                    }
                    EventKind::Break => {
                        e.rest = Some(crate::domain::BreakInfo {
                            location: Some(location.to_string()),
                            ..Default::default()
                        });
                    }
                    _ => {}
                }
                e
            })
    }

    fn schedule_strategy() -> impl Strategy<Value = ScheduleData> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["S1", "S2", "General"]),
                prop::sample::select(vec!["Bus 1", "Bus 2", "Bus 3", "General 1"]),
                prop::collection::vec(event_strategy(), 0..8),
            ),
            0..8,
        )
        .prop_map(|duties| {
            let mut shifts: Vec<ShiftSchedule> = Vec::new();
            for (shift, bus, events) in duties {
                let idx = match shifts.iter().position(|s| s.shift.as_str() == shift) {
                    Some(i) => i,
                    None => {
                        shifts.push(ShiftSchedule {
                            shift: ShiftId::new(shift),
                            buses: Vec::new(),
                        });
                        shifts.len() - 1
                    }
                };
                if shifts[idx].buses.iter().all(|b| b.bus_key != bus) {
                    shifts[idx].buses.push(BusSchedule {
                        bus_key: bus.to_string(),
                        events,
                    });
                }
            }
            ScheduleData {
                shifts,
                ..ScheduleData::default()
            }
        })
    }

    fn expected_keys(data: &ScheduleData) -> HashSet<RowKey> {
        data.buses()
            .flat_map(|(_, b)| b.events.iter())
            .flat_map(|e| contributions(e, BreakCellStyle::To))
            .map(|c| c.key)
            .collect()
    }

    proptest! {
        #[test]
        fn one_row_per_distinct_label(data in schedule_strategy()) {
            let config = ViewConfig::default();
            let table = build_pivot(&collect_duties(&data, &config), &config);

            let keys: HashSet<RowKey> = table.rows.iter().map(|r| r.label.key.clone()).collect();
            prop_assert_eq!(keys.len(), table.rows.len());
            prop_assert_eq!(keys, expected_keys(&data));
        }

        #[test]
        fn every_row_spans_every_column(data in schedule_strategy()) {
            let config = ViewConfig::default();
            let collection = collect_duties(&data, &config);
            let table = build_pivot(&collection, &config);

            prop_assert_eq!(table.columns.len(), collection.len());
            let span: usize = table.column_groups.iter().map(|g| g.span).sum();
            prop_assert_eq!(span, table.columns.len());
            for row in &table.rows {
                prop_assert_eq!(row.cells.len(), table.columns.len());
                prop_assert!(row.cells.iter().any(Option::is_some));
            }
        }

        #[test]
        fn rows_are_ordered_by_priority(data in schedule_strategy()) {
            let config = ViewConfig::default();
            let table = build_pivot(&collect_duties(&data, &config), &config);

            for pair in table.rows.windows(2) {
                prop_assert!(pair[0].label.sort_key <= pair[1].label.sort_key);
                prop_assert!(pair[0].label.sort_key.priority <= pair[1].label.sort_key.priority);
            }
        }

        #[test]
        fn pivot_is_idempotent(data in schedule_strategy()) {
            let config = ViewConfig::default();
            let first = build_pivot(&collect_duties(&data, &config), &config);
            let second = build_pivot(&collect_duties(&data, &config), &config);
            prop_assert_eq!(first, second);
        }
    }
}
