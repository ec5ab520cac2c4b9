use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A caregiver contact attached to a patient.
///
/// Missed-dose escalation goes out to caregivers with
/// `notifications_enabled`; contact details are consumed by the
/// dispatching collaborator, not by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub notifications_enabled: bool,
    pub emergency_contact: bool,
}
