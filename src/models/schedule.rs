use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::EngineError;

/// A wall-clock time of day, decoupled from any calendar date.
///
/// Parses from and serializes to the `"HH:MM"` wire form. No timezone is
/// attached; the engine operates entirely in the patient's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, EngineError> {
        if hour > 23 || minute > 59 {
            return Err(EngineError::InvalidTimeOfDay {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Components are range-checked at construction.
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTimeOfDay { value: s.into() };

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.to_string()
    }
}

/// A recurring weekly dose schedule for one medicine.
///
/// `days_of_week` uses ISO weekday numbers, Monday=1 through Sunday=7.
/// Invariant: non-empty and in range while the schedule is active,
/// enforced by `validate` at the edge; the occurrence generator simply
/// produces nothing for a schedule that violates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub time_of_day: TimeOfDay,
    pub days_of_week: Vec<u8>,
    pub is_active: bool,
}

impl Schedule {
    /// Edge validation for incoming schedule records.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.is_active && self.days_of_week.is_empty() {
            return Err(EngineError::InvalidSchedule {
                schedule_id: self.id,
                reason: "active schedule has empty days_of_week".into(),
            });
        }
        if let Some(&day) = self.days_of_week.iter().find(|&&d| !(1..=7).contains(&d)) {
            return Err(EngineError::InvalidSchedule {
                schedule_id: self.id,
                reason: format!("day {day} outside 1..=7 (Monday=1)"),
            });
        }
        Ok(())
    }

    /// Whether a dose is due on `date`, in the same local frame the
    /// caller's window uses.
    pub fn matches_day(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().number_from_monday() as u8;
        self.days_of_week.contains(&weekday)
    }
}
