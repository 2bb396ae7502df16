use std::sync::Arc;
use crate::domain::ports::{
    BlockedDateRepository, BookingRepository, EmailService, OtpGateway,
    PaymentGateway, ResourceRepository,
};
use crate::domain::services::sessions::ReservationSessions;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub blocked_date_repo: Arc<dyn BlockedDateRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub otp_gateway: Arc<dyn OtpGateway>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
    pub sessions: Arc<ReservationSessions>,
}
