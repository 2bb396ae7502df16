use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Verification code could not be sent: {0}")]
    VerificationSend(String),
    #[error("Verification code rejected")]
    VerificationRejected,
    #[error("Payment could not be initiated: {0}")]
    PaymentInit(String),
    #[error("Payment failed: {0}")]
    PaymentGateway(String),
    #[error("Payment captured but booking not confirmed (payment {payment_id})")]
    CommitAfterPayment { payment_id: String },
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::VerificationSend(msg) => {
                error!("OTP send failed: {}", msg);
                (StatusCode::BAD_GATEWAY, format!("Could not send verification code: {}", msg))
            }
            AppError::VerificationRejected => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Incorrect or expired verification code".to_string())
            }
            AppError::PaymentInit(msg) => {
                error!("Payment initiation failed: {}", msg);
                (StatusCode::BAD_GATEWAY, format!("Could not initiate payment: {}", msg))
            }
            AppError::PaymentGateway(msg) => {
                (StatusCode::PAYMENT_REQUIRED, format!("Payment failed: {}", msg))
            }
            AppError::CommitAfterPayment { payment_id } => {
                error!("Commit failed after captured payment {}", payment_id);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Your payment was captured but the booking could not be confirmed. Please contact support; do not retry the payment.",
                        "payment_id": payment_id,
                    }))
                ).into_response();
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
