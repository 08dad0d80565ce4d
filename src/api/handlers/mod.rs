pub mod auth;
pub mod availability;
pub mod booking;
pub mod health;
pub mod member;
pub mod organization;
pub mod transfer;
pub mod vehicle;
