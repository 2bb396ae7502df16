use serde::Serialize;
use chrono::NaiveDate;

use crate::domain::models::blocked_date::BlockedDateSet;
use crate::domain::models::resource::Resource;
use crate::domain::services::availability;
use crate::domain::services::pricing::{self, Quote};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    Online,
    Offline,
}

/// The in-progress booking attempt. Owned exclusively by one reservation
/// session; every setter validates before mutating, so a rejected edit
/// leaves the draft exactly as it was.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDraft {
    pub resource_id: String,
    pub plate_order: Option<i32>,
    pub adults: i32,
    pub children: i32,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payment_mode: PaymentMode,
}

/// Keeps digits only and truncates to the 10 significant digits of a
/// national mobile number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(10).collect()
}

pub fn is_valid_mobile(phone: &str) -> bool {
    phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.as_bytes()[0], b'6'..=b'9')
}

impl BookingDraft {
    pub fn new(resource_id: String) -> Self {
        Self {
            resource_id,
            plate_order: None,
            adults: 1,
            children: 0,
            check_in: None,
            check_out: None,
            email: None,
            phone: None,
            payment_mode: PaymentMode::Online,
        }
    }

    pub fn set_check_in(&mut self, date: NaiveDate, blocked: &BlockedDateSet) -> Result<(), AppError> {
        if availability::is_blocked(date, blocked) {
            return Err(AppError::Validation(format!("{} is not available for check-in", date)));
        }
        self.check_in = Some(date);
        Ok(())
    }

    pub fn set_check_out(&mut self, date: NaiveDate, blocked: &BlockedDateSet) -> Result<(), AppError> {
        if availability::is_blocked(date, blocked) {
            return Err(AppError::Validation(format!("{} is not available for check-out", date)));
        }
        self.check_out = Some(date);
        Ok(())
    }

    pub fn set_occupancy(&mut self, adults: i32, children: i32, max_guests: i32) -> Result<(), AppError> {
        if adults < 1 || children < 0 {
            return Err(AppError::Validation("At least one adult is required".into()));
        }
        if adults + children > max_guests {
            return Err(AppError::Validation(format!(
                "Guest count exceeds the limit of {} for this selection", max_guests
            )));
        }
        self.adults = adults;
        self.children = children;
        Ok(())
    }

    pub fn set_email(&mut self, email: String) -> Result<(), AppError> {
        let trimmed = email.trim().to_string();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(AppError::Validation("A valid email address is required".into()));
        }
        self.email = Some(trimmed);
        Ok(())
    }

    pub fn set_phone(&mut self, raw: &str) -> Result<(), AppError> {
        let digits = normalize_phone(raw);
        if digits.is_empty() {
            return Err(AppError::Validation("A phone number is required".into()));
        }
        self.phone = Some(digits);
        Ok(())
    }

    pub fn set_plate_order(&mut self, plates: i32, resource: &Resource) -> Result<(), AppError> {
        if resource.price_per_plate.is_none() {
            return Err(AppError::Validation("Plate orders are only available for catering lawns".into()));
        }
        if plates < 1 {
            return Err(AppError::Validation("Plate count must be at least 1".into()));
        }
        self.plate_order = Some(plates);
        Ok(())
    }

    /// Live quote for the current draft. None until both stay dates are set.
    pub fn quote(&self, resource: &Resource) -> Option<Quote> {
        let (check_in, check_out) = (self.check_in?, self.check_out?);
        let quote = match (self.plate_order, resource.price_per_plate) {
            (Some(plates), Some(per_plate)) => {
                pricing::quote_catering(per_plate, plates, check_in, check_out)
            }
            _ => pricing::quote(resource.price, check_in, check_out),
        };
        Some(quote)
    }

    pub fn contact_complete(&self) -> bool {
        self.email.is_some() && self.phone.as_deref().is_some_and(is_valid_mobile)
    }
}
