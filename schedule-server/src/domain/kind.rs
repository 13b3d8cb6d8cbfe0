//! Event kinds and their display priority.

use std::fmt;

use serde::{Serialize, Serializer};

/// Priority given to kinds the scheduler introduced after this catalog.
pub const UNKNOWN_PRIORITY: u8 = 99;

/// The kind of a schedule event.
///
/// The scheduler may extend its catalog at any time, so unrecognised kinds
/// are kept as [`EventKind::Unknown`] instead of being rejected.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::EventKind;
///
/// assert_eq!(EventKind::parse("Calling Time"), EventKind::CallingTime);
/// assert_eq!(EventKind::parse("TripToDepot"), EventKind::TripToDepot);
/// assert_eq!(EventKind::parse("Refuel").priority(), 99);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    CallingTime,
    Preparation,
    DepotMovement,
    Trip,
    Break,
    TripToDepot,
    CheckingTime,
    DutyEnd,
    Unknown(String),
}

impl EventKind {
    /// Parse a kind from the scheduler's `type` string.
    ///
    /// Matching ignores case, spaces and underscores, so both
    /// "Calling Time" and "CallingTime" are recognised.
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "callingtime" => EventKind::CallingTime,
            "preparation" => EventKind::Preparation,
            "depotmovement" => EventKind::DepotMovement,
            "trip" => EventKind::Trip,
            "break" => EventKind::Break,
            "triptodepot" => EventKind::TripToDepot,
            "checkingtime" => EventKind::CheckingTime,
            "dutyend" => EventKind::DutyEnd,
            _ => EventKind::Unknown(s.trim().to_string()),
        }
    }

    /// Row ordering priority; lower sorts first.
    ///
    /// Trip and Break share a priority so a break is placed among the
    /// trips by time instead of after all of them.
    pub fn priority(&self) -> u8 {
        match self {
            EventKind::CallingTime => 1,
            EventKind::Preparation => 2,
            EventKind::DepotMovement => 3,
            EventKind::Trip | EventKind::Break => 4,
            EventKind::TripToDepot => 5,
            EventKind::CheckingTime => 6,
            EventKind::DutyEnd => 7,
            EventKind::Unknown(_) => UNKNOWN_PRIORITY,
        }
    }

    /// Human-readable name, as shown in row labels.
    pub fn name(&self) -> &str {
        match self {
            EventKind::CallingTime => "Calling Time",
            EventKind::Preparation => "Preparation",
            EventKind::DepotMovement => "Depot Movement",
            EventKind::Trip => "Trip",
            EventKind::Break => "Break",
            EventKind::TripToDepot => "Trip to Depot",
            EventKind::CheckingTime => "Checking Time",
            EventKind::DutyEnd => "Duty End",
            EventKind::Unknown(name) => name,
        }
    }

    /// Whether this kind moves a bus between the depot and the route.
    pub fn is_depot_run(&self) -> bool {
        matches!(self, EventKind::DepotMovement | EventKind::TripToDepot)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
