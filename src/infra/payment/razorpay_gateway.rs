use crate::domain::models::payment::GatewayOrder;
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

/// Razorpay Orders API client. Order creation is the only call that
/// crosses this boundary; capture happens in the hosted checkout and is
/// reported back through the client callback.
pub struct RazorpayGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    // Razorpay amounts are in minor units (paise).
    amount: i64,
}

impl RazorpayGateway {
    pub fn new(base_url: String, key_id: String, key_secret: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            key_id,
            key_secret,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, amount: i64, currency: &str, receipt: &str) -> Result<GatewayOrder, AppError> {
        let url = format!("{}/v1/orders", self.base_url);
        let payload = json!({
            "amount": amount * 100,
            "currency": currency,
            "receipt": receipt,
        });

        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(&url)
                .basic_auth(&self.key_id, Some(&self.key_secret))
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let order: OrderResponse = response.json().await.map_err(|e| {
                            error!("Failed to parse Razorpay order response: {:?}", e);
                            AppError::PaymentInit("Unreadable gateway response".into())
                        })?;
                        info!("Razorpay order {} created for receipt {}", order.id, receipt);
                        return Ok(GatewayOrder {
                            id: order.id,
                            amount: order.amount / 100,
                        });
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Razorpay order creation failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::PaymentInit(format!("Gateway error: {} - {}", status, text)));
                        }
                        warn!("Razorpay transient error {}. Retrying in {}ms...", status, backoff);
                        sleep(Duration::from_millis(backoff)).await;
                        retries += 1;
                        backoff *= 2;
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Razorpay rejected order creation. Status: {}, Body: {}", status, text);
                        return Err(AppError::PaymentInit(format!("Gateway rejected the order: {}", status)));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Razorpay unreachable after {} retries: {:?}", retries, e);
                        return Err(AppError::PaymentInit("Payment gateway unreachable".into()));
                    }
                    warn!("Razorpay connection error: {}. Retrying in {}ms...", e, backoff);
                    sleep(Duration::from_millis(backoff)).await;
                    retries += 1;
                    backoff *= 2;
                }
            }
        }
    }
}
