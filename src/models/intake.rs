use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::IntakeStatus;

/// A recorded dose event: the patient took, skipped, or was marked as
/// having missed a dose.
///
/// `scheduled_time` ties the record back to an occurrence via the
/// classifier's nearest-match rule; `created_at` breaks ties when two
/// records land equally close to the same occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intake {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub scheduled_time: NaiveDateTime,
    pub actual_time: Option<NaiveDateTime>,
    pub status: IntakeStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
