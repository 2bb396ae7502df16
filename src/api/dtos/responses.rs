use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::draft::BookingDraft;
use crate::domain::services::pricing::Quote;
use crate::domain::services::reservation::{FlowState, ReservationFlow};

#[derive(Serialize)]
pub struct ReservationCreatedResponse {
    pub reservation_id: String,
    pub state: FlowState,
    pub blocked_dates: Vec<NaiveDate>,
}

/// Snapshot of a session returned after every edit and flow step.
#[derive(Serialize)]
pub struct ReservationResponse {
    pub reservation_id: String,
    pub state: FlowState,
    pub draft: BookingDraft,
    pub quote: Option<Quote>,
}

impl ReservationResponse {
    pub fn from_flow(flow: &ReservationFlow) -> Self {
        Self {
            reservation_id: flow.id.clone(),
            state: flow.state,
            draft: flow.draft.clone(),
            quote: flow.quote(),
        }
    }
}

#[derive(Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub amount: i64,
}

#[derive(Serialize)]
pub struct PaymentOrderResponse {
    pub order: OrderSummary,
}
