use serde::{Deserialize, Serialize};

/// Order as echoed back by the payment gateway. Amount is in whole
/// rupees; the adapter converts from the gateway's minor units.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state")]
pub enum AttemptState {
    OrderCreated,
    Succeeded { payment_id: String },
    Failed { reason: String },
    Abandoned,
}

/// A single order placed with the payment gateway. The amount is the
/// draft total quoted at creation time and is never re-derived.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentAttempt {
    pub order_id: String,
    pub amount: i64,
    pub state: AttemptState,
}

impl PaymentAttempt {
    pub fn order_created(order_id: String, amount: i64) -> Self {
        Self {
            order_id,
            amount,
            state: AttemptState::OrderCreated,
        }
    }

    pub fn succeed(&mut self, payment_id: String) {
        self.state = AttemptState::Succeeded { payment_id };
    }

    pub fn fail(&mut self, reason: String) {
        self.state = AttemptState::Failed { reason };
    }

    pub fn abandon(&mut self) {
        self.state = AttemptState::Abandoned;
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, AttemptState::OrderCreated)
    }
}
