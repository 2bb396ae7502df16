use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub otp_service_url: String,
    pub otp_service_key: String,
    pub razorpay_url: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub currency: String,
    pub admin_token: String,
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            otp_service_url: env::var("OTP_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1/otp".to_string()),
            otp_service_key: env::var("OTP_SERVICE_KEY").unwrap_or_else(|_| "test-otp-key".to_string()),
            razorpay_url: env::var("RAZORPAY_URL").unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            razorpay_key_id: env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID must be set"),
            razorpay_key_secret: env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET must be set"),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            admin_token: env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN must be set"),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES").unwrap_or_else(|_| "45".to_string()).parse().expect("SESSION_TTL_MINUTES must be a number"),
        }
    }
}
