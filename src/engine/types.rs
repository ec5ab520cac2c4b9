use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{AlertKind, AlertTarget, DoseStatus};
use crate::models::{Caregiver, Intake, Medicine, Patient, Schedule};

/// One concrete instance of a recurring schedule at a specific
/// date+time. Derived fresh on every evaluation, never stored; identity
/// is the (schedule_id, scheduled_at) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub medicine_id: Uuid,
    pub schedule_id: Uuid,
    pub scheduled_at: NaiveDateTime,
}

/// An occurrence with its classification attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedDose {
    pub occurrence: Occurrence,
    pub status: DoseStatus,
    /// Seconds between taking and the scheduled time; negative when the
    /// dose was taken early. Present for taken doses only.
    pub lateness_seconds: Option<i64>,
    /// The matched intake record, when one exists.
    pub intake_id: Option<Uuid>,
}

/// Rolling adherence statistics over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    /// Resolved doses only: pending and upcoming doses count neither
    /// for nor against compliance.
    pub total_doses: u32,
    pub taken_doses: u32,
    /// 0–100, round-half-up. Zero when no dose has resolved.
    pub compliance_percent: u8,
    /// Consecutive fully-compliant scheduled days, counted backward from
    /// the most recent fully-resolved day.
    pub current_streak_days: u32,
}

/// Result of a stock check, counts included so the refill alert payload
/// needs no second lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatus {
    pub is_low: bool,
    pub remaining_count: i32,
    pub refill_threshold: i32,
}

/// Payload carried by an emitted alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AlertDetail {
    Dose {
        schedule_id: Uuid,
        scheduled_at: NaiveDateTime,
    },
    Stock {
        remaining_count: i32,
        refill_threshold: i32,
    },
}

/// A notification the evaluation decided should fire. Emitted, never
/// persisted here; delivery, dedup, and storage belong to the
/// dispatching collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub medicine_id: Uuid,
    pub target: AlertTarget,
    pub detail: AlertDetail,
}

impl AlertEvent {
    /// Idempotency key for collaborator-side suppression: at most one
    /// delivery per medicine, kind, and calendar day.
    pub fn dedup_key(&self, date: NaiveDate) -> String {
        format!("{}:{}:{}", self.medicine_id, self.kind.as_str(), date)
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::MedicationReminder => "Medication reminder",
            AlertKind::RefillReminder => "Refill reminder",
            AlertKind::MissedDoseAlert => "Missed dose",
        }
    }

    /// Human-readable body for the notification/SMS dispatcher.
    pub fn message(&self, medicine: &Medicine) -> String {
        match (&self.kind, &self.detail) {
            (AlertKind::MedicationReminder, AlertDetail::Dose { scheduled_at, .. }) => {
                format!(
                    "Reminder: take {} {} at {}",
                    medicine.name,
                    medicine.dosage,
                    scheduled_at.format("%H:%M"),
                )
            }
            (AlertKind::MissedDoseAlert, AlertDetail::Dose { scheduled_at, .. }) => {
                format!(
                    "{} {} scheduled for {} was not taken",
                    medicine.name,
                    medicine.dosage,
                    scheduled_at.format("%H:%M"),
                )
            }
            (_, AlertDetail::Stock { remaining_count, .. }) => {
                format!(
                    "{} is running low: {} doses left",
                    medicine.name, remaining_count,
                )
            }
            // The engine never pairs these; keep the render total anyway.
            (AlertKind::RefillReminder, AlertDetail::Dose { .. }) => {
                format!("{} needs a refill", medicine.name)
            }
        }
    }
}

/// Everything one evaluation tick needs for a single patient, assembled
/// by the caller ahead of time. Medicines keep their input order; event
/// emission is grouped by it.
#[derive(Debug, Clone)]
pub struct EvaluationSnapshot {
    pub patient: Patient,
    pub medicines: Vec<Medicine>,
    pub schedules: HashMap<Uuid, Vec<Schedule>>,
    pub intakes: HashMap<Uuid, Vec<Intake>>,
    pub caregivers: Vec<Caregiver>,
}

impl EvaluationSnapshot {
    pub fn schedules_for(&self, medicine_id: Uuid) -> &[Schedule] {
        self.schedules
            .get(&medicine_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn intakes_for(&self, medicine_id: Uuid) -> &[Intake] {
        self.intakes
            .get(&medicine_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Missed-dose escalation gate: at least one caregiver opted in.
    pub fn caregiver_alerting_enabled(&self) -> bool {
        self.caregivers.iter().any(|c| c.notifications_enabled)
    }
}
