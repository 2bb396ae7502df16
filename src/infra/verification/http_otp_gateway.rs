use crate::domain::ports::OtpGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::error;

/// Client for the external one-time-code provider. The provider owns
/// code generation, expiry and rate limiting; we only relay.
pub struct HttpOtpGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    success: bool,
}

impl HttpOtpGateway {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl OtpGateway for HttpOtpGateway {
    async fn request_code(&self, email: &str, phone: &str) -> Result<(), AppError> {
        let res = self.client.post(format!("{}/send", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "email": email, "phone": phone }))
            .send()
            .await
            .map_err(|e| {
                error!("OTP provider connection error: {}", e);
                AppError::VerificationSend("provider unreachable".into())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("OTP send failed. Status: {}, Body: {}", status, text);
            return Err(AppError::VerificationSend(format!("provider returned {}", status)));
        }

        Ok(())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<bool, AppError> {
        let res = self.client.post(format!("{}/verify", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "email": email, "otp": code }))
            .send()
            .await
            .map_err(|e| {
                error!("OTP provider connection error: {}", e);
                AppError::VerificationSend("provider unreachable".into())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            error!("OTP verify failed. Status: {}", status);
            return Err(AppError::VerificationSend(format!("provider returned {}", status)));
        }

        let body: VerifyResponse = res.json().await.map_err(|e| {
            error!("Unreadable OTP verify response: {:?}", e);
            AppError::VerificationSend("unreadable provider response".into())
        })?;

        Ok(body.success)
    }
}
