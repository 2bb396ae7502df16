use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketState {
    Pending,
    Verified,
}

/// One-time-code challenge bound to a single (email, phone) pair.
/// Lives and dies with one reservation attempt; never reused.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationTicket {
    pub email: String,
    pub phone: String,
    pub state: TicketState,
    pub requested_at: DateTime<Utc>,
}

impl VerificationTicket {
    pub fn pending(email: String, phone: String) -> Self {
        Self {
            email,
            phone,
            state: TicketState::Pending,
            requested_at: Utc::now(),
        }
    }

    pub fn mark_verified(&mut self) {
        self.state = TicketState::Verified;
    }

    pub fn is_verified(&self) -> bool {
        self.state == TicketState::Verified
    }

    /// A ticket only covers the exact contact pair it was issued for.
    pub fn covers(&self, email: &str, phone: &str) -> bool {
        self.email == email && self.phone == phone
    }
}
