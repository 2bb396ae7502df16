use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tera::Tera;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::blocked_date::BlockedDateSet;
use crate::domain::models::booking::{Booking, NewBookingParams, OFFLINE_PAYMENT_ID};
use crate::domain::models::draft::{BookingDraft, PaymentMode, is_valid_mobile};
use crate::domain::models::payment::{GatewayOrder, PaymentAttempt};
use crate::domain::models::resource::Resource;
use crate::domain::models::verification::VerificationTicket;
use crate::domain::ports::{BlockedDateRepository, BookingRepository, EmailService, OtpGateway, PaymentGateway};
use crate::domain::services::availability;
use crate::domain::services::invoice::render_invoice;
use crate::domain::services::pricing::{self, Quote};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    Draft,
    Verifying,
    Verified,
    PayInitiating,
    PayOpen,
    Committing,
    Done,
    Failed,
}

/// Ports the commit step needs. Handlers borrow these out of AppState;
/// tests pass mocks directly.
pub struct CommitDeps<'a> {
    pub blocked_dates: &'a dyn BlockedDateRepository,
    pub bookings: &'a dyn BookingRepository,
    pub email: &'a dyn EmailService,
    pub templates: &'a Tera,
}

/// One reservation attempt. Owns the draft and walks it forward through
/// verification, payment and commit; transitions never go backwards except
/// the explicit rewind on payment failure/cancel.
pub struct ReservationFlow {
    pub id: String,
    pub resource: Resource,
    pub draft: BookingDraft,
    pub blocked: BlockedDateSet,
    pub requires_verification: bool,
    pub state: FlowState,
    pub ticket: Option<VerificationTicket>,
    pub attempt: Option<PaymentAttempt>,
    pub booking_id: Option<String>,
    pub touched_at: DateTime<Utc>,
}

impl ReservationFlow {
    pub fn new(resource: Resource, blocked: BlockedDateSet, requires_verification: bool) -> Self {
        let draft = BookingDraft::new(resource.id.clone());
        Self {
            id: Uuid::new_v4().to_string(),
            resource,
            draft,
            blocked,
            requires_verification,
            state: FlowState::Draft,
            ticket: None,
            attempt: None,
            booking_id: None,
            touched_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.touched_at = Utc::now();
    }

    pub fn quote(&self) -> Option<Quote> {
        self.draft.quote(&self.resource)
    }

    fn editable(&self) -> bool {
        matches!(self.state, FlowState::Draft | FlowState::Verifying | FlowState::Verified)
    }

    fn guard_editable(&self) -> Result<(), AppError> {
        if self.editable() {
            Ok(())
        } else {
            Err(AppError::Conflict("The reservation can no longer be edited".into()))
        }
    }

    /// Where a failed or cancelled payment attempt lands: back on the
    /// verified step for public sessions, back on the draft for operators.
    fn rewind_to_editable(&mut self) {
        self.state = if self.requires_verification && self.ticket.as_ref().is_some_and(|t| t.is_verified()) {
            FlowState::Verified
        } else {
            FlowState::Draft
        };
    }

    /// A verification ticket only covers the contact pair it was issued
    /// for; changing either field sends the session back to Draft.
    fn invalidate_stale_ticket(&mut self) {
        let stale = match (&self.ticket, &self.draft.email, &self.draft.phone) {
            (Some(ticket), Some(email), Some(phone)) => !ticket.covers(email, phone),
            (Some(_), _, _) => true,
            (None, _, _) => false,
        };
        if stale {
            info!("Contact changed on reservation {}; verification reset", self.id);
            self.ticket = None;
            self.state = FlowState::Draft;
        }
    }

    // ---- field edits -------------------------------------------------

    pub fn edit_check_in(&mut self, date: NaiveDate) -> Result<(), AppError> {
        self.guard_editable()?;
        self.draft.set_check_in(date, &self.blocked)
    }

    pub fn edit_check_out(&mut self, date: NaiveDate) -> Result<(), AppError> {
        self.guard_editable()?;
        self.draft.set_check_out(date, &self.blocked)
    }

    pub fn edit_occupancy(&mut self, adults: i32, children: i32) -> Result<(), AppError> {
        self.guard_editable()?;
        self.draft.set_occupancy(adults, children, self.resource.max_guests)
    }

    pub fn edit_email(&mut self, email: String) -> Result<(), AppError> {
        self.guard_editable()?;
        self.draft.set_email(email)?;
        self.invalidate_stale_ticket();
        Ok(())
    }

    pub fn edit_phone(&mut self, raw: &str) -> Result<(), AppError> {
        self.guard_editable()?;
        self.draft.set_phone(raw)?;
        self.invalidate_stale_ticket();
        Ok(())
    }

    pub fn edit_plate_order(&mut self, plates: i32) -> Result<(), AppError> {
        self.guard_editable()?;
        let resource = self.resource.clone();
        self.draft.set_plate_order(plates, &resource)
    }

    // ---- verification ------------------------------------------------

    pub async fn request_code(&mut self, otp: &dyn OtpGateway) -> Result<(), AppError> {
        if !self.requires_verification {
            return Err(AppError::Conflict("Verification is not required for operator bookings".into()));
        }
        if !matches!(self.state, FlowState::Draft | FlowState::Verifying) {
            return Err(AppError::Conflict("A verification code cannot be requested now".into()));
        }

        let (email, phone) = match (&self.draft.email, &self.draft.phone) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e.clone(), p.clone()),
            _ => return Err(AppError::VerificationSend("email and phone are required".into())),
        };
        if !is_valid_mobile(&phone) {
            return Err(AppError::Validation("A valid 10-digit mobile number is required".into()));
        }

        otp.request_code(&email, &phone).await?;

        self.ticket = Some(VerificationTicket::pending(email, phone));
        self.state = FlowState::Verifying;
        info!("Verification code requested for reservation {}", self.id);
        Ok(())
    }

    pub async fn submit_code(&mut self, otp: &dyn OtpGateway, code: &str) -> Result<(), AppError> {
        if self.state != FlowState::Verifying {
            return Err(AppError::Conflict("No verification is in progress".into()));
        }
        let ticket = self.ticket.as_mut().ok_or(AppError::Internal)?;

        if !otp.verify_code(&ticket.email, code).await? {
            return Err(AppError::VerificationRejected);
        }

        ticket.mark_verified();
        self.state = FlowState::Verified;
        info!("Reservation {} verified", self.id);
        Ok(())
    }

    // ---- payment -----------------------------------------------------

    /// Everything that must hold before money moves or a record is cut.
    fn validate_payable(&self) -> Result<Quote, AppError> {
        let (check_in, check_out) = match (self.draft.check_in, self.draft.check_out) {
            (Some(ci), Some(co)) => (ci, co),
            _ => return Err(AppError::Validation("Check-in and check-out dates are required".into())),
        };
        if check_out <= check_in {
            return Err(AppError::Validation("Check-out must be after check-in".into()));
        }
        if !self.draft.contact_complete() {
            return Err(AppError::Validation("A contact email and 10-digit mobile number are required".into()));
        }
        let quote = self
            .quote()
            .ok_or_else(|| AppError::Validation("Stay dates are incomplete".into()))?;
        if quote.total_amount <= 0 {
            return Err(AppError::Validation("Total amount must be positive".into()));
        }
        Ok(quote)
    }

    async fn refresh_blocked(&mut self, repo: &dyn BlockedDateRepository) -> Result<(), AppError> {
        let rows = repo.list(Some(self.resource.kind)).await?;
        self.blocked = BlockedDateSet::from_rows(&rows, self.resource.kind);
        Ok(())
    }

    pub async fn begin_payment(
        &mut self,
        blocked_dates: &dyn BlockedDateRepository,
        gateway: &dyn PaymentGateway,
        currency: &str,
    ) -> Result<GatewayOrder, AppError> {
        let expected = if self.requires_verification { FlowState::Verified } else { FlowState::Draft };
        if self.state != expected {
            return Err(AppError::Conflict("Payment cannot be started from the current step".into()));
        }

        let quote = self.validate_payable()?;
        self.state = FlowState::PayInitiating;

        // The snapshot taken at session start may be stale; an
        // administrator can block a date while the form sits open.
        if let Err(e) = self.refresh_blocked(blocked_dates).await {
            self.rewind_to_editable();
            return Err(e);
        }
        let (check_in, check_out) = (self.draft.check_in.unwrap(), self.draft.check_out.unwrap());
        if let Err(e) = availability::validate_range(check_in, check_out, &self.blocked) {
            self.rewind_to_editable();
            return Err(e);
        }

        let receipt = format!("rsv_{}", self.id);
        let order = match gateway.create_order(quote.total_amount, currency, &receipt).await {
            Ok(order) => order,
            Err(e) => {
                self.rewind_to_editable();
                return Err(e);
            }
        };

        if order.amount != quote.total_amount {
            warn!(
                "Gateway order {} echoed amount {} for quoted total {}",
                order.id, order.amount, quote.total_amount
            );
            self.rewind_to_editable();
            return Err(AppError::PaymentInit(format!(
                "Gateway order amount {} does not match the quoted total {}",
                order.amount, quote.total_amount
            )));
        }

        self.attempt = Some(PaymentAttempt::order_created(order.id.clone(), quote.total_amount));
        self.state = FlowState::PayOpen;
        info!("Payment order {} created for reservation {}", order.id, self.id);
        Ok(order)
    }

    /// Success callback from the hosted checkout. Runs the commit; this is
    /// the one transition that must not be re-enterable once started.
    pub async fn complete_payment(
        &mut self,
        deps: &CommitDeps<'_>,
        payment_id: String,
    ) -> Result<Booking, AppError> {
        if self.state != FlowState::PayOpen {
            return Err(AppError::Conflict("No payment is awaiting completion".into()));
        }
        let amount = match &self.attempt {
            Some(attempt) => attempt.amount,
            None => return Err(AppError::Internal),
        };

        self.state = FlowState::Committing;
        if let Some(attempt) = &mut self.attempt {
            attempt.succeed(payment_id.clone());
        }

        match self.persist_and_invoice(deps, amount, payment_id.clone()).await {
            Ok(booking) => {
                self.booking_id = Some(booking.id.clone());
                self.state = FlowState::Done;
                info!("Reservation {} committed as booking {}", self.id, booking.id);
                Ok(booking)
            }
            Err(e) => {
                // Money has been captured; nothing here may retry or
                // refund. Park the session and hand off to a human.
                error!(
                    "Commit failed after captured payment {} on reservation {}: {:?}",
                    payment_id, self.id, e
                );
                self.state = FlowState::Failed;
                Err(AppError::CommitAfterPayment { payment_id })
            }
        }
    }

    pub fn payment_failed(&mut self, reason: &str) -> Result<(), AppError> {
        if self.state != FlowState::PayOpen {
            return Err(AppError::Conflict("No payment is open".into()));
        }
        if let Some(attempt) = &mut self.attempt {
            attempt.fail(reason.to_string());
        }
        warn!("Payment failed on reservation {}: {}", self.id, reason);
        self.rewind_to_editable();
        Ok(())
    }

    pub fn payment_cancelled(&mut self) -> Result<(), AppError> {
        if self.state != FlowState::PayOpen {
            return Err(AppError::Conflict("No payment is open".into()));
        }
        if let Some(attempt) = &mut self.attempt {
            attempt.abandon();
        }
        info!("Checkout dismissed on reservation {}", self.id);
        self.rewind_to_editable();
        Ok(())
    }

    // ---- operator offline commit ------------------------------------

    pub async fn commit_offline(&mut self, deps: &CommitDeps<'_>) -> Result<Booking, AppError> {
        if self.requires_verification {
            return Err(AppError::Conflict("Offline payment is an operator-only path".into()));
        }
        if self.state != FlowState::Draft {
            return Err(AppError::Conflict("The reservation has already moved past the draft step".into()));
        }

        let quote = self.validate_payable()?;
        self.draft.payment_mode = PaymentMode::Offline;
        self.state = FlowState::Committing;

        match self
            .persist_and_invoice(deps, quote.total_amount, OFFLINE_PAYMENT_ID.to_string())
            .await
        {
            Ok(booking) => {
                self.booking_id = Some(booking.id.clone());
                self.state = FlowState::Done;
                info!("Offline reservation {} committed as booking {}", self.id, booking.id);
                Ok(booking)
            }
            Err(e) => {
                error!("Offline commit failed on reservation {}: {:?}", self.id, e);
                self.state = FlowState::Failed;
                Err(e)
            }
        }
    }

    // ---- commit ------------------------------------------------------

    async fn persist_and_invoice(
        &self,
        deps: &CommitDeps<'_>,
        amount: i64,
        payment_id: String,
    ) -> Result<Booking, AppError> {
        let (check_in, check_out) = (self.draft.check_in.unwrap(), self.draft.check_out.unwrap());

        let rows = deps.blocked_dates.list(Some(self.resource.kind)).await?;
        let latest = BlockedDateSet::from_rows(&rows, self.resource.kind);
        availability::validate_range(check_in, check_out, &latest)?;

        let booking = Booking::new(NewBookingParams {
            resource_id: self.resource.id.clone(),
            resource_kind: self.resource.kind,
            email: self.draft.email.clone().unwrap_or_default(),
            phone: self.draft.phone.clone().unwrap_or_default(),
            check_in,
            check_out,
            nights: pricing::nights_between(check_in, check_out),
            adults: self.draft.adults,
            children: self.draft.children,
            plate_order: self.draft.plate_order,
            amount,
            payment_id,
        });

        let created = deps.bookings.create(&booking).await?;

        // The booking stands even if the invoice cannot go out; emailing
        // is a side effect of an already-irreversible commit.
        match render_invoice(deps.templates, &created, &self.resource) {
            Ok((subject, body)) => {
                if let Err(e) = deps.email.send(&created.customer_email, &subject, &body, None, None).await {
                    error!("Invoice email failed for booking {}: {:?}", created.id, e);
                }
            }
            Err(e) => error!("Invoice render failed for booking {}: {:?}", created.id, e),
        }

        Ok(created)
    }
}
