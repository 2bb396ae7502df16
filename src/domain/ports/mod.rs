use crate::domain::models::{
    blocked_date::BlockedDate,
    booking::Booking,
    payment::GatewayOrder,
    resource::{Resource, ResourceKind},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError>;
    async fn list(&self) -> Result<Vec<Resource>, AppError>;
}

#[async_trait]
pub trait BlockedDateRepository: Send + Sync {
    async fn create(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, kind: Option<ResourceKind>) -> Result<Vec<BlockedDate>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self) -> Result<Vec<Booking>, AppError>;
}

/// One-time-code identity verification provider.
#[async_trait]
pub trait OtpGateway: Send + Sync {
    async fn request_code(&self, email: &str, phone: &str) -> Result<(), AppError>;
    async fn verify_code(&self, email: &str, code: &str) -> Result<bool, AppError>;
}

/// Hosted-checkout payment provider. Only order creation crosses this
/// boundary; the capture outcome arrives through the client callback.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, amount: i64, currency: &str, receipt: &str) -> Result<GatewayOrder, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}
