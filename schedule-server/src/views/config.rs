//! Presentation choices for the schedule views.
//!
//! Several details of the printed schedules changed over the life of the
//! depot's paperwork: where the General group sits, how shifts are ordered,
//! how a break cell reads, and whether the post-break board row repeats the
//! shift length. Each is a setting here rather than a hard-coded rule.

use std::str::FromStr;

use crate::domain::ShiftId;

/// Error parsing a view setting from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {setting}: {value:?} (expected {expected})")]
pub struct SettingError {
    setting: &'static str,
    value: String,
    expected: &'static str,
}

/// Where the General (pool) group sits among the shift groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralPlacement {
    /// Ahead of the first shift group whose id differs from the given one.
    /// With "S1" this puts General between S1 and the next shift, and first
    /// when there is no S1.
    BeforeShiftsOtherThan(ShiftId),
    /// After the first `n` shift groups; `0` puts General first.
    AfterShifts(usize),
    /// After every shift group.
    Last,
}

impl Default for GeneralPlacement {
    fn default() -> Self {
        GeneralPlacement::BeforeShiftsOtherThan(ShiftId::new("S1"))
    }
}

impl GeneralPlacement {
    /// Index at which the General group is inserted among the sorted
    /// `shifts`.
    pub fn insert_index(&self, shifts: &[ShiftId]) -> usize {
        match self {
            GeneralPlacement::BeforeShiftsOtherThan(kept) => shifts
                .iter()
                .position(|s| s != kept)
                .unwrap_or(shifts.len()),
            GeneralPlacement::AfterShifts(n) => (*n).min(shifts.len()),
            GeneralPlacement::Last => shifts.len(),
        }
    }
}

impl FromStr for GeneralPlacement {
    type Err = SettingError;

    /// Accepts `first`, `last`, `after:<n>` or `before-other-than:<shift>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "first" => return Ok(GeneralPlacement::AfterShifts(0)),
            "last" => return Ok(GeneralPlacement::Last),
            _ => {}
        }

        let invalid = || SettingError {
            setting: "general placement",
            value: s.to_string(),
            expected: "first, last, after:<n> or before-other-than:<shift>",
        };

        if let Some(n) = lower.strip_prefix("after:") {
            return n
                .trim()
                .parse()
                .map(GeneralPlacement::AfterShifts)
                .map_err(|_| invalid());
        }
        if lower.starts_with("before-other-than:") {
            let shift = s["before-other-than:".len()..].trim();
            if !shift.is_empty() {
                return Ok(GeneralPlacement::BeforeShiftsOtherThan(ShiftId::new(shift)));
            }
        }
        Err(invalid())
    }
}

/// How shift identifiers are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftOrdering {
    /// Plain string comparison: "S10" sorts before "S2".
    #[default]
    Lexicographic,
    /// By the number embedded in the id, then by text: "S2" before "S10".
    Natural,
}

impl FromStr for ShiftOrdering {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" | "lex" => Ok(ShiftOrdering::Lexicographic),
            "natural" | "numeric" => Ok(ShiftOrdering::Natural),
            other => Err(SettingError {
                setting: "shift ordering",
                value: other.to_string(),
                expected: "lexicographic or natural",
            }),
        }
    }
}

/// How a break is written in a grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreakCellStyle {
    /// "11:00 to 11:30"
    #[default]
    To,
    /// "11:00 - 11:30"
    Dash,
}

impl BreakCellStyle {
    pub fn render(&self, start: &str, end: &str) -> String {
        match self {
            BreakCellStyle::To => format!("{start} to {end}"),
            BreakCellStyle::Dash => format!("{start} - {end}"),
        }
    }
}

impl FromStr for BreakCellStyle {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "to" => Ok(BreakCellStyle::To),
            "dash" | "-" => Ok(BreakCellStyle::Dash),
            other => Err(SettingError {
                setting: "break cell style",
                value: other.to_string(),
                expected: "to or dash",
            }),
        }
    }
}

/// What the post-break duty board row shows as shift length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecondRowDuration {
    /// Same value as the first row.
    #[default]
    Repeat,
    /// Empty.
    Blank,
}

impl FromStr for SecondRowDuration {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repeat" => Ok(SecondRowDuration::Repeat),
            "blank" => Ok(SecondRowDuration::Blank),
            other => Err(SettingError {
                setting: "second row duration",
                value: other.to_string(),
                expected: "repeat or blank",
            }),
        }
    }
}

/// Default anchor bus for the public timetable.
pub const DEFAULT_ANCHOR_BUS: &str = "Bus 1";

/// Settings shared by all three views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub general_placement: GeneralPlacement,
    pub shift_ordering: ShiftOrdering,
    pub break_cell_style: BreakCellStyle,
    pub second_row_duration: SecondRowDuration,
    /// Timetable label ("Bus 1", "Gen 2") whose first departure starts
    /// each direction's list.
    pub anchor_bus: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            general_placement: GeneralPlacement::default(),
            shift_ordering: ShiftOrdering::default(),
            break_cell_style: BreakCellStyle::default(),
            second_row_duration: SecondRowDuration::default(),
            anchor_bus: DEFAULT_ANCHOR_BUS.to_string(),
        }
    }
}

impl ViewConfig {
    pub fn with_general_placement(mut self, placement: GeneralPlacement) -> Self {
        self.general_placement = placement;
        self
    }

    pub fn with_shift_ordering(mut self, ordering: ShiftOrdering) -> Self {
        self.shift_ordering = ordering;
        self
    }

    pub fn with_break_cell_style(mut self, style: BreakCellStyle) -> Self {
        self.break_cell_style = style;
        self
    }

    pub fn with_second_row_duration(mut self, duration: SecondRowDuration) -> Self {
        self.second_row_duration = duration;
        self
    }

    pub fn with_anchor_bus(mut self, bus: impl Into<String>) -> Self {
        self.anchor_bus = bus.into();
        self
    }
}
