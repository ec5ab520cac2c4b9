use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MedicineForm;

/// A tracked medicine. Owned by exactly one patient.
///
/// The engine only reads medicines. `remaining_count` is decremented by
/// the intake-recording collaborator when a taken dose is recorded,
/// never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Free-form display string, e.g. "500mg".
    pub dosage: String,
    pub form: MedicineForm,
    pub remaining_count: i32,
    pub refill_threshold: i32,
    pub instructions: Option<String>,
    pub side_effects: Option<String>,
    pub created_at: NaiveDateTime,
}
