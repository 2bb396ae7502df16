use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, reference, resource_id, resource_kind, customer_email, customer_phone, check_in, check_out, nights, adults, children, plate_order, amount, payment_id, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.reference).bind(&booking.resource_id).bind(booking.resource_kind)
            .bind(&booking.customer_email).bind(&booking.customer_phone).bind(booking.check_in).bind(booking.check_out)
            .bind(booking.nights).bind(booking.adults).bind(booking.children).bind(booking.plate_order)
            .bind(booking.amount).bind(&booking.payment_id).bind(&booking.status).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
