//! Duty identity and the duty record itself.
//!
//! The scheduler keys buses by display strings such as "Bus 3", "General 2"
//! or "Bus 3 - S1". These are parsed once here into structured labels so
//! that no downstream code has to pick numbers out of formatted text.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use super::event::ScheduleEvent;

/// Name of the pool pseudo-shift and prefix of pool bus labels.
pub const GENERAL: &str = "General";

/// A parsed bus label.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::BusLabel;
///
/// let bus = BusLabel::parse("Bus 3 - S1");
/// assert_eq!(bus.as_str(), "Bus 3");
/// assert_eq!(bus.number(), Some(3));
/// assert!(!bus.is_pool());
///
/// let pool = BusLabel::parse("General Bus 2");
/// assert!(pool.is_pool());
/// assert_eq!(pool.short(), "Gen 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusLabel {
    label: String,
    number: Option<u32>,
    pool: bool,
}

impl BusLabel {
    /// Parse a bus key as sent by the scheduler.
    pub fn parse(raw: &str) -> Self {
        let label = raw
            .split_once(" - ")
            .map_or(raw, |(bus, _)| bus)
            .trim()
            .to_string();

        let number = label
            .split(|c: char| !c.is_ascii_digit())
            .find(|token| !token.is_empty())
            .and_then(|token| token.parse().ok());

        let pool = label
            .get(..GENERAL.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(GENERAL));

        Self {
            label,
            number,
            pool,
        }
    }

    /// The display label ("Bus 3").
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// The number embedded in the label, if any.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    /// Whether this is an unnumbered-shift pool bus.
    pub fn is_pool(&self) -> bool {
        self.pool
    }

    /// Compact label used on the public timetable: "Bus 3" or "Gen 2".
    pub fn short(&self) -> String {
        match (self.pool, self.number) {
            (false, Some(n)) => format!("Bus {n}"),
            (true, Some(n)) => format!("Gen {n}"),
            _ => self.label.clone(),
        }
    }

    /// Column order within a shift: numbered buses by number, then pool
    /// buses by number, then anything without a number by label.
    pub fn column_cmp(&self, other: &Self) -> Ordering {
        self.column_rank()
            .cmp(&other.column_rank())
            .then_with(|| self.label.cmp(&other.label))
    }

    fn column_rank(&self) -> (u8, u32) {
        match (self.pool, self.number) {
            (false, Some(n)) => (0, n),
            (true, Some(n)) => (1, n),
            (_, None) => (2, 0),
        }
    }
}

impl fmt::Display for BusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for BusLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

/// An opaque shift identifier such as "S1".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the pool pseudo-shift.
    pub fn is_general(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(GENERAL)
    }

    /// The first number embedded in the identifier ("S12" → 12).
    pub fn number(&self) -> Option<u32> {
        self.0
            .split(|c: char| !c.is_ascii_digit())
            .find(|token| !token.is_empty())
            .and_then(|token| token.parse().ok())
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a duty: one bus within one shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DutyId {
    pub bus: BusLabel,
    pub shift: ShiftId,
}

impl DutyId {
    pub fn new(bus: BusLabel, shift: ShiftId) -> Self {
        Self { bus, shift }
    }

    /// Pool duties are presented in the General group.
    pub fn is_pool(&self) -> bool {
        self.shift.is_general() || self.bus.is_pool()
    }
}

impl fmt::Display for DutyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.bus, self.shift)
    }
}

/// One bus's assignment within one shift.
///
/// Events are sorted by raw time when the duty is built; the scheduler does
/// not guarantee any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duty {
    pub id: DutyId,
    pub events: Vec<ScheduleEvent>,
}

impl Duty {
    pub fn new(id: DutyId, mut events: Vec<ScheduleEvent>) -> Self {
        events.sort_by_key(ScheduleEvent::sort_minutes);
        Self { id, events }
    }

    /// The earliest event matching `pred`.
    pub fn find(&self, pred: impl Fn(&ScheduleEvent) -> bool) -> Option<&ScheduleEvent> {
        self.events.iter().find(|e| pred(e))
    }
}
