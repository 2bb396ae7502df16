use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

use crate::domain::models::resource::ResourceKind;

/// Sentinel stored in place of a gateway payment id when an operator
/// records an offline (pay-at-desk) booking.
pub const OFFLINE_PAYMENT_ID: &str = "OFFLINE";

/// The durable record of a committed reservation. Financial terms are
/// immutable once created; there is no update path.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub reference: String,
    pub resource_id: String,
    pub resource_kind: ResourceKind,
    pub customer_email: String,
    pub customer_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub plate_order: Option<i32>,
    pub amount: i64,
    pub payment_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub resource_id: String,
    pub resource_kind: ResourceKind,
    pub email: String,
    pub phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub adults: i32,
    pub children: i32,
    pub plate_order: Option<i32>,
    pub amount: i64,
    pub payment_id: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let reference: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();

        Self {
            id: Uuid::new_v4().to_string(),
            reference,
            resource_id: params.resource_id,
            resource_kind: params.resource_kind,
            customer_email: params.email,
            customer_phone: params.phone,
            check_in: params.check_in,
            check_out: params.check_out,
            nights: params.nights as i32,
            adults: params.adults,
            children: params.children,
            plate_order: params.plate_order,
            amount: params.amount,
            payment_id: params.payment_id,
            status: "CONFIRMED".to_string(),
            created_at: Utc::now(),
        }
    }
}
