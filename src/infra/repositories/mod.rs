pub mod postgres_blocked_date_repo;
pub mod postgres_booking_repo;
pub mod postgres_resource_repo;
pub mod sqlite_blocked_date_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_resource_repo;
