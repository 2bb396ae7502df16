use chrono::NaiveDate;

use crate::domain::models::blocked_date::BlockedDateSet;
use crate::error::AppError;

pub fn is_blocked(date: NaiveDate, blocked: &BlockedDateSet) -> bool {
    blocked.contains(date)
}

/// Both endpoints of a stay must be bookable. Applied on every date edit
/// and again against a fresh snapshot right before a payment order is
/// created; the second pass closes (best-effort) the window in which an
/// administrator blocks a date under an open session.
pub fn validate_range(check_in: NaiveDate, check_out: NaiveDate, blocked: &BlockedDateSet) -> Result<(), AppError> {
    if is_blocked(check_in, blocked) {
        return Err(AppError::Validation(format!("{} is no longer available", check_in)));
    }
    if is_blocked(check_out, blocked) {
        return Err(AppError::Validation(format!("{} is no longer available", check_out)));
    }
    Ok(())
}
