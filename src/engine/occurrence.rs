//! Expands a recurring weekly schedule into concrete dose occurrences
//! within a time window.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::Schedule;

use super::types::Occurrence;

/// Lazy walk over the calendar days of a window, emitting one
/// occurrence per day the schedule is due. Finite; `Clone` restarts
/// from the top.
#[derive(Debug, Clone)]
pub struct OccurrenceIter {
    schedule: Schedule,
    cursor: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for OccurrenceIter {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while let Some(day) = self.cursor {
            self.cursor = if day < self.last { day.succ_opt() } else { None };
            if self.schedule.matches_day(day) {
                return Some(Occurrence {
                    medicine_id: self.schedule.medicine_id,
                    schedule_id: self.schedule.id,
                    scheduled_at: day.and_time(self.schedule.time_of_day.to_naive_time()),
                });
            }
        }
        None
    }
}

/// All occurrences of `schedule` falling on a calendar day within
/// `[window_start, window_end]`, in chronological order.
///
/// Partial boundary days count in full: a window opening mid-day still
/// yields that day's occurrence even when `time_of_day` has already
/// passed; classification, not generation, decides what it is. The
/// window is expected in the patient's local frame; no timezone
/// shifting happens here. Inactive schedules, empty day sets, and
/// inverted windows all yield an empty sequence.
pub fn occurrences(
    schedule: &Schedule,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> OccurrenceIter {
    let producing =
        schedule.is_active && !schedule.days_of_week.is_empty() && window_start <= window_end;

    OccurrenceIter {
        schedule: schedule.clone(),
        cursor: producing.then(|| window_start.date()),
        last: window_end.date(),
    }
}
