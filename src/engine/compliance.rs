//! Reduces classified doses over a window into compliance statistics
//! and the current streak.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::enums::DoseStatus;

use super::types::{ClassifiedDose, ComplianceSnapshot};

fn is_resolved(status: DoseStatus) -> bool {
    matches!(
        status,
        DoseStatus::Taken | DoseStatus::Missed | DoseStatus::Skipped
    )
}

/// Aggregate classified doses into a compliance snapshot.
///
/// Pure and order-independent: doses are grouped by calendar day
/// internally, so caller ordering does not matter. Pending and upcoming
/// doses are excluded from the totals: a dose that has not resolved
/// counts neither for nor against compliance.
pub fn aggregate(
    doses: &[ClassifiedDose],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> ComplianceSnapshot {
    let total_doses = doses.iter().filter(|d| is_resolved(d.status)).count() as u32;
    let taken_doses = doses
        .iter()
        .filter(|d| d.status == DoseStatus::Taken)
        .count() as u32;

    // Round-half-up on the percentage value.
    let compliance_percent = if total_doses > 0 {
        (100.0 * f64::from(taken_doses) / f64::from(total_doses)).round() as u8
    } else {
        0
    };

    ComplianceSnapshot {
        window_start,
        window_end,
        total_doses,
        taken_doses,
        compliance_percent,
        current_streak_days: current_streak(doses),
    }
}

/// Consecutive fully-compliant scheduled days, counted backward from
/// the most recent fully-resolved day.
///
/// A day is fully resolved when no dose scheduled that day is still
/// pending or upcoming; it qualifies for the streak when every resolved
/// dose that day is taken. The walk skips the leading run of
/// not-yet-resolved days, then stops at the first non-qualifying day.
fn current_streak(doses: &[ClassifiedDose]) -> u32 {
    let mut by_day: BTreeMap<NaiveDate, Vec<DoseStatus>> = BTreeMap::new();
    for dose in doses {
        by_day
            .entry(dose.occurrence.scheduled_at.date())
            .or_default()
            .push(dose.status);
    }

    let resolved_days = by_day
        .values()
        .rev()
        .skip_while(|statuses| statuses.iter().any(|&s| !is_resolved(s)));

    let mut streak = 0;
    for statuses in resolved_days {
        let qualifies = statuses
            .iter()
            .filter(|&&s| is_resolved(s))
            .all(|&s| s == DoseStatus::Taken);
        if !qualifies {
            break;
        }
        streak += 1;
    }
    streak
}
