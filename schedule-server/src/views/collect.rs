//! Flattening a nested schedule into ordered duty columns.
//!
//! Every downstream view works from the [`DutyCollection`] built here and
//! never from the nested payload, so header grouping and column order are
//! decided in exactly one place.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{BusLabel, Duty, DutyId, GENERAL, ScheduleData, ShiftId};

use super::config::{ShiftOrdering, ViewConfig};

/// Whether a group holds one shift's duties or the pool duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Shift,
    General,
}

/// A run of adjacent columns under one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyGroup {
    pub name: String,
    pub kind: GroupKind,
    pub duties: Vec<Duty>,
}

/// A header cell spanning `span` duty columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub name: String,
    pub kind: GroupKind,
    pub span: usize,
}

/// All duties of a schedule, grouped and in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DutyCollection {
    pub groups: Vec<DutyGroup>,
}

impl DutyCollection {
    /// Duties in column order.
    pub fn duties(&self) -> impl Iterator<Item = &Duty> {
        self.groups.iter().flat_map(|g| g.duties.iter())
    }

    /// Duties in column order, each with the index of its group.
    pub fn duties_with_group(&self) -> impl Iterator<Item = (usize, &Duty)> {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(i, g)| g.duties.iter().map(move |d| (i, d)))
    }

    /// Header cells for the first header row.
    pub fn column_groups(&self) -> Vec<ColumnGroup> {
        self.groups
            .iter()
            .map(|g| ColumnGroup {
                name: g.name.clone(),
                kind: g.kind,
                span: g.duties.len(),
            })
            .collect()
    }

    /// Number of duty columns.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.duties.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compare two shift ids under the configured ordering.
pub fn compare_shifts(a: &ShiftId, b: &ShiftId, ordering: ShiftOrdering) -> Ordering {
    match ordering {
        ShiftOrdering::Lexicographic => a.as_str().cmp(b.as_str()),
        ShiftOrdering::Natural => {
            let key = |s: &ShiftId| (s.number().is_none(), s.number());
            key(a).cmp(&key(b)).then_with(|| a.as_str().cmp(b.as_str()))
        }
    }
}

/// Flatten a schedule into grouped, ordered duties.
///
/// Every (shift, bus) pair becomes a duty, including buses with no events,
/// so each still gets a column. Pool duties (shift "General" or a
/// "General" bus) are gathered into a single General group placed per
/// [`ViewConfig::general_placement`].
pub fn collect_duties(data: &ScheduleData, config: &ViewConfig) -> DutyCollection {
    let ordering = config.shift_ordering;

    let mut shift_groups: Vec<(ShiftId, Vec<Duty>)> = Vec::new();
    let mut pool: Vec<Duty> = Vec::new();

    for shift in &data.shifts {
        let mut duties = Vec::new();
        for bus in &shift.buses {
            let id = DutyId::new(BusLabel::parse(&bus.bus_key), shift.shift.clone());
            let duty = Duty::new(id, bus.events.clone());
            if duty.id.is_pool() {
                pool.push(duty);
            } else {
                duties.push(duty);
            }
        }

        match shift_groups.iter_mut().find(|(id, _)| *id == shift.shift) {
            Some((_, existing)) => existing.extend(duties),
            None if !duties.is_empty() => shift_groups.push((shift.shift.clone(), duties)),
            None => {}
        }
    }

    shift_groups.sort_by(|(a, _), (b, _)| compare_shifts(a, b, ordering));

    let shift_order: Vec<ShiftId> = shift_groups.iter().map(|(id, _)| id.clone()).collect();
    let mut groups: Vec<DutyGroup> = shift_groups
        .into_iter()
        .map(|(shift, mut duties)| {
            duties.sort_by(|a, b| a.id.bus.column_cmp(&b.id.bus));
            DutyGroup {
                name: shift.to_string(),
                kind: GroupKind::Shift,
                duties,
            }
        })
        .collect();

    if !pool.is_empty() {
        pool.sort_by(|a, b| {
            a.id.bus
                .column_cmp(&b.id.bus)
                .then_with(|| compare_shifts(&a.id.shift, &b.id.shift, ordering))
        });
        let at = config.general_placement.insert_index(&shift_order);
        groups.insert(
            at,
            DutyGroup {
                name: GENERAL.to_string(),
                kind: GroupKind::General,
                duties: pool,
            },
        );
    }

    DutyCollection { groups }
}
