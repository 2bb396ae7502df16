pub mod blocked_date;
pub mod booking;
pub mod catalog;
pub mod health;
pub mod reservation;
