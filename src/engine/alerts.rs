//! Top-level evaluation tick: occurrences → classification → events.

use chrono::NaiveDateTime;

use crate::config::EngineConfig;
use crate::models::enums::{AlertKind, AlertTarget, DoseStatus};
use crate::models::Medicine;

use super::classify::classify;
use super::occurrence::occurrences;
use super::stock::check_stock;
use super::types::{AlertDetail, AlertEvent, ClassifiedDose, EvaluationSnapshot};

/// Evaluate one patient's medicines at `now` and return the events that
/// should fire.
///
/// Stateless and side-effect free: the engine always emits, and the
/// dispatching collaborator suppresses repeats via
/// [`AlertEvent::dedup_key`]. Events are grouped by medicine in snapshot
/// order; within one medicine reminders come first, then missed-dose
/// alerts, then refill, occurrence-driven events ordered by
/// `scheduled_at`.
pub fn evaluate(
    now: NaiveDateTime,
    snapshot: &EvaluationSnapshot,
    config: &EngineConfig,
) -> Vec<AlertEvent> {
    let mut events = Vec::new();
    for medicine in &snapshot.medicines {
        evaluate_medicine(now, medicine, snapshot, config, &mut events);
    }

    tracing::debug!(
        patient = %snapshot.patient.id,
        medicines = snapshot.medicines.len(),
        events = events.len(),
        "evaluation tick complete"
    );
    events
}

/// Single-medicine evaluation, appended to `out` all-or-nothing so
/// callers that fan out per medicine can concatenate results without
/// partial state.
fn evaluate_medicine(
    now: NaiveDateTime,
    medicine: &Medicine,
    snapshot: &EvaluationSnapshot,
    config: &EngineConfig,
    out: &mut Vec<AlertEvent>,
) {
    let window_start = now - config.look_back;
    let window_end = now + config.look_ahead;
    let intakes = snapshot.intakes_for(medicine.id);

    let mut doses: Vec<ClassifiedDose> = snapshot
        .schedules_for(medicine.id)
        .iter()
        .flat_map(|schedule| occurrences(schedule, window_start, window_end))
        .map(|occurrence| classify(&occurrence, intakes, now, config))
        .collect();
    doses.sort_by_key(|d| d.occurrence.scheduled_at);

    let dose_event = |kind: AlertKind, target: AlertTarget, dose: &ClassifiedDose| AlertEvent {
        kind,
        medicine_id: medicine.id,
        target,
        detail: AlertDetail::Dose {
            schedule_id: dose.occurrence.schedule_id,
            scheduled_at: dose.occurrence.scheduled_at,
        },
    };

    // Reminders: due now, or due within the configured lead.
    for dose in &doses {
        let due_soon = dose.status == DoseStatus::Upcoming
            && dose.occurrence.scheduled_at - now <= config.reminder_lead;
        if dose.status == DoseStatus::Pending || due_soon {
            out.push(dose_event(
                AlertKind::MedicationReminder,
                AlertTarget::Patient,
                dose,
            ));
        }
    }

    // Missed doses escalate to the caregiver when one is reachable.
    let escalate = snapshot.caregiver_alerting_enabled();
    for dose in doses.iter().filter(|d| d.status == DoseStatus::Missed) {
        out.push(dose_event(
            AlertKind::MissedDoseAlert,
            AlertTarget::Patient,
            dose,
        ));
        if escalate {
            out.push(dose_event(
                AlertKind::MissedDoseAlert,
                AlertTarget::Caregiver,
                dose,
            ));
        }
    }

    let stock = check_stock(medicine);
    if stock.is_low {
        out.push(AlertEvent {
            kind: AlertKind::RefillReminder,
            medicine_id: medicine.id,
            target: AlertTarget::Patient,
            detail: AlertDetail::Stock {
                remaining_count: stock.remaining_count,
                refill_threshold: stock.refill_threshold,
            },
        });
    }
}
