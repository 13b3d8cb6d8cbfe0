//! The printed duty board.
//!
//! Each duty becomes one row, or two when the crew takes a break: the
//! first covers reporting to first departure, the second runs from the end
//! of the break to the end of the duty.

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    Duty, DutyId, EventKind, ScheduleEvent, ScheduleIssue, format_shift_duration, span_between,
};

use super::collect::DutyCollection;
use super::config::{SecondRowDuration, ViewConfig};

/// Shown when a duty has no first trip departure.
pub const NO_DEPARTURE: &str = "N/A";

/// One line of the duty board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyBoardRow {
    /// 1-based line number.
    pub serial: usize,
    pub bus_no: String,
    pub reporting_time: String,
    pub boarding_time: String,
    pub departure_time: String,
    pub total_shift_duration: String,
    /// Whether this is the post-break half of a split duty.
    pub after_break: bool,
    pub duty: DutyId,
}

/// A duty that could not be placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedDuty {
    pub duty: DutyId,
    pub issue: ScheduleIssue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DutyBoard {
    pub rows: Vec<DutyBoardRow>,
    pub excluded: Vec<ExcludedDuty>,
}

/// Build the duty board.
///
/// Rows are ordered by duty group (the same group order as the grid
/// header), then by reporting time as text. `HH:MM` compares correctly as
/// text for same-day times.
pub fn build_duty_board(collection: &DutyCollection, config: &ViewConfig) -> DutyBoard {
    let mut board = DutyBoard::default();
    let mut ranked: Vec<(usize, DutyBoardRow)> = Vec::new();

    for (rank, duty) in collection.duties_with_group() {
        match split_duty(duty, config.second_row_duration) {
            Ok(rows) => ranked.extend(rows.into_iter().map(|r| (rank, r))),
            Err(issue) => {
                debug!(duty = %duty.id, %issue, "duty left off the board");
                board.excluded.push(ExcludedDuty {
                    duty: duty.id.clone(),
                    issue,
                });
            }
        }
    }

    ranked.sort_by(|(a_rank, a), (b_rank, b)| {
        a_rank
            .cmp(b_rank)
            .then_with(|| a.reporting_time.cmp(&b.reporting_time))
    });

    board.rows = ranked
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut row))| {
            row.serial = i + 1;
            row
        })
        .collect();

    board
}

/// Board rows for one duty, before numbering.
fn split_duty(
    duty: &Duty,
    second_row: SecondRowDuration,
) -> Result<Vec<DutyBoardRow>, ScheduleIssue> {
    let calling = duty
        .find(of_kind(EventKind::CallingTime))
        .ok_or_else(|| ScheduleIssue::missing(&duty.id, EventKind::CallingTime))?;
    let end = duty
        .find(of_kind(EventKind::DutyEnd))
        .ok_or_else(|| ScheduleIssue::missing(&duty.id, EventKind::DutyEnd))?;
    let preparation = duty.find(of_kind(EventKind::Preparation));
    let first_trip = duty.find(of_kind(EventKind::Trip));
    let rest = duty.find(of_kind(EventKind::Break));

    let duration = format_shift_duration(span_between(calling.raw_time, end.raw_time));
    let bus_no = match duty.id.bus.number() {
        Some(n) if !duty.id.bus.is_pool() => n.to_string(),
        _ => duty.id.bus.short(),
    };
    let departure = first_trip
        .and_then(ScheduleEvent::first_leg)
        .and_then(|leg| leg.departure_display())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_DEPARTURE.to_string());

    let mut rows = vec![DutyBoardRow {
        serial: 0,
        bus_no: bus_no.clone(),
        reporting_time: calling.display(),
        boarding_time: preparation.map(ScheduleEvent::display).unwrap_or_default(),
        departure_time: departure,
        total_shift_duration: duration.clone(),
        after_break: false,
        duty: duty.id.clone(),
    }];

    if let Some(rest) = rest {
        let resume = match &rest.rest {
            Some(info) => info.end_display(),
            None => String::new(),
        };
        rows.push(DutyBoardRow {
            serial: 0,
            bus_no,
            reporting_time: resume,
            boarding_time: end.display(),
            departure_time: String::new(),
            total_shift_duration: match second_row {
                SecondRowDuration::Repeat => duration,
                SecondRowDuration::Blank => String::new(),
            },
            after_break: true,
            duty: duty.id.clone(),
        });
    }

    Ok(rows)
}

fn of_kind(kind: EventKind) -> impl Fn(&ScheduleEvent) -> bool {
    move |e| e.kind == kind
}
