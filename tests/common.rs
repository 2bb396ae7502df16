use reservation_backend::{
    api::router::create_router,
    config::Config,
    domain::models::booking::Booking,
    domain::models::payment::GatewayOrder,
    domain::ports::{BookingRepository, EmailService, OtpGateway, PaymentGateway},
    domain::services::sessions::ReservationSessions,
    error::AppError,
    infra::repositories::{
        sqlite_blocked_date_repo::SqliteBlockedDateRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_resource_repo::SqliteResourceRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const ACCEPTED_OTP: &str = "123456";

pub struct MockOtpGateway {
    pub sends: AtomicUsize,
}

#[async_trait]
impl OtpGateway for MockOtpGateway {
    async fn request_code(&self, _email: &str, _phone: &str) -> Result<(), AppError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn verify_code(&self, _email: &str, code: &str) -> Result<bool, AppError> {
        Ok(code == ACCEPTED_OTP)
    }
}

pub struct MockPaymentGateway {
    pub orders: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, amount: i64, _currency: &str, _receipt: &str) -> Result<GatewayOrder, AppError> {
        let n = self.orders.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            id: format!("order_test_{}", n),
            amount,
        })
    }
}

pub struct MockEmailService {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        _html_body: &str,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Booking store that refuses every insert; stands in for a database
/// outage between payment capture and commit.
pub struct FailingBookingRepo;

#[async_trait]
impl BookingRepository for FailingBookingRepo {
    async fn create(&self, _booking: &Booking) -> Result<Booking, AppError> {
        Err(AppError::InternalWithMsg("insert refused".into()))
    }
    async fn find_by_id(&self, _id: &str) -> Result<Option<Booking>, AppError> {
        Ok(None)
    }
    async fn list(&self) -> Result<Vec<Booking>, AppError> {
        Ok(Vec::new())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub otp: Arc<MockOtpGateway>,
    pub payments: Arc<MockPaymentGateway>,
    pub emails: Arc<MockEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn with_failing_bookings() -> Self {
        Self::build(true).await
    }

    async fn build(failing_bookings: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "invoice.html",
            "<html>Invoice {{ reference }}: {{ nights }} night(s), total {{ amount }}, payment {{ payment_id }}</html>",
        )
        .unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            otp_service_url: "http://localhost".to_string(),
            otp_service_key: "otp-key".to_string(),
            razorpay_url: "http://localhost".to_string(),
            razorpay_key_id: "rzp_test".to_string(),
            razorpay_key_secret: "secret".to_string(),
            currency: "INR".to_string(),
            admin_token: ADMIN_TOKEN.to_string(),
            session_ttl_minutes: 45,
        };

        let otp = Arc::new(MockOtpGateway { sends: AtomicUsize::new(0) });
        let payments = Arc::new(MockPaymentGateway { orders: AtomicUsize::new(0) });
        let emails = Arc::new(MockEmailService { sent: Mutex::new(Vec::new()) });

        let booking_repo: Arc<dyn BookingRepository> = if failing_bookings {
            Arc::new(FailingBookingRepo)
        } else {
            Arc::new(SqliteBookingRepo::new(pool.clone()))
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            resource_repo: Arc::new(SqliteResourceRepo::new(pool.clone())),
            blocked_date_repo: Arc::new(SqliteBlockedDateRepo::new(pool.clone())),
            booking_repo,
            otp_gateway: otp.clone(),
            payment_gateway: payments.clone(),
            email_service: emails.clone(),
            templates,
            sessions: Arc::new(ReservationSessions::new()),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            otp,
            payments,
            emails,
        }
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri)
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("POST").uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())).unwrap()
        ).await.unwrap()
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("PATCH").uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())).unwrap()
        ).await.unwrap()
    }

    pub async fn operator_post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("POST").uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                .body(Body::from(body.to_string())).unwrap()
        ).await.unwrap()
    }

    pub async fn operator_get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    pub async fn operator_delete(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("DELETE").uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    /// Seeds a standard room and returns its id.
    pub async fn seed_room(&self) -> String {
        let res = self.operator_post_json(
            "/api/v1/options",
            serde_json::json!({
                "type": "ROOM", "name": "Deluxe Room",
                "price": 2000, "max_guests": 5
            }),
        ).await;
        assert!(res.status().is_success(), "seeding room failed: {}", res.status());
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }

    /// Seeds a catering lawn and returns its id.
    pub async fn seed_lawn(&self) -> String {
        let res = self.operator_post_json(
            "/api/v1/options",
            serde_json::json!({
                "type": "LAWN", "name": "Garden Lawn",
                "price": 15000, "max_guests": 200, "price_per_plate": 450
            }),
        ).await;
        assert!(res.status().is_success(), "seeding lawn failed: {}", res.status());
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
