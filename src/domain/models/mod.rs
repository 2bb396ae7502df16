pub mod blocked_date;
pub mod booking;
pub mod draft;
pub mod payment;
pub mod resource;
pub mod verification;
