pub mod alerts;
pub mod classify;
pub mod compliance;
pub mod occurrence;
pub mod stock;
pub mod types;

pub use alerts::evaluate;
pub use classify::classify;
pub use compliance::aggregate;
pub use occurrence::occurrences;
pub use stock::check_stock;

use thiserror::Error;
use uuid::Uuid;

/// Engine-edge failures. The computation core never fails: invalid
/// inputs are rejected here, at the boundary, and the pure functions
/// return empty or default results rather than fabricating data.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid schedule {schedule_id}: {reason}")]
    InvalidSchedule { schedule_id: Uuid, reason: String },

    #[error("Invalid time of day: {value}")]
    InvalidTimeOfDay { value: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
