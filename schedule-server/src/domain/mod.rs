//! Domain types for duty schedules.
//!
//! This module holds the shared vocabulary of the presentation engine:
//! event kinds and their priority, clock times, legs and breaks, and the
//! structured identity of a duty. Values are built once from the
//! scheduler's payload and never mutated afterwards.

mod duty;
mod error;
mod event;
mod kind;
mod schedule;
mod time;

pub use duty::{BusLabel, Duty, DutyId, GENERAL, ShiftId};
pub use error::ScheduleIssue;
pub use event::{BreakInfo, Leg, ScheduleEvent};
pub use kind::{EventKind, UNKNOWN_PRIORITY};
pub use schedule::{BusSchedule, ScheduleData, ShiftSchedule};
pub use time::{ClockTime, TimeError, format_shift_duration, span_between};
