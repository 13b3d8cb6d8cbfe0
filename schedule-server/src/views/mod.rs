//! The three presentation views derived from a schedule.
//!
//! All builders are pure functions of their input: a grid and a duty board
//! built from a [`DutyCollection`], and a timetable built from the schedule
//! itself.

mod board;
mod collect;
mod config;
mod pivot;
mod timetable;

pub use board::{DutyBoard, DutyBoardRow, ExcludedDuty, NO_DEPARTURE, build_duty_board};
pub use collect::{
    ColumnGroup, DutyCollection, DutyGroup, GroupKind, collect_duties, compare_shifts,
};
pub use config::{
    BreakCellStyle, DEFAULT_ANCHOR_BUS, GeneralPlacement, SecondRowDuration, SettingError,
    ShiftOrdering, ViewConfig,
};
pub use pivot::{PivotRow, PivotTable, RowKey, RowLabel, RowSortKey, build_pivot};
pub use timetable::{
    Departure, Direction, Timetable, TimetableEntry, build_timetable, extract_departures,
    wrap_around_sort,
};
