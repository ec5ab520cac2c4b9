use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The medicine owner's delivery preferences.
///
/// Carried through the evaluation snapshot untouched so the dispatcher
/// can decide whether a patient-targeted alert also goes out as SMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub sms_enabled: bool,
    pub phone_number: Option<String>,
}
