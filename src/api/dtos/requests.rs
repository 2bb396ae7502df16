use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::resource::ResourceKind;

#[derive(Deserialize)]
pub struct CreateResourceRequest {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    pub price: i64,
    pub max_guests: i32,
    pub price_per_plate: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateBlockedDateRequest {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub resource_id: String,
}

/// Field-level draft edits. Absent fields are untouched; each present
/// field is validated before it lands on the draft.
#[derive(Deserialize)]
pub struct UpdateReservationRequest {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plate_order: Option<i32>,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

/// What the hosted checkout reports back: exactly one of a captured
/// payment id, a gateway failure description, or a user dismissal.
#[derive(Deserialize)]
pub struct PaymentCallbackRequest {
    pub razorpay_payment_id: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
}
