//! Low-stock flagging from the current remaining count.

use crate::models::Medicine;

use super::types::StockStatus;

/// Flag a medicine whose remaining count has depleted to its refill
/// threshold.
///
/// Read-only: the intake-recording collaborator owns the decrement, one
/// per taken dose. A negative count is a caller bug; it still reports
/// low here rather than being clamped.
pub fn check_stock(medicine: &Medicine) -> StockStatus {
    StockStatus {
        is_low: medicine.remaining_count <= medicine.refill_threshold,
        remaining_count: medicine.remaining_count,
        refill_threshold: medicine.refill_threshold,
    }
}
