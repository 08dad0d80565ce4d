pub mod audit;
pub mod auth;
pub mod booking;
pub mod organization;
pub mod transfer;
pub mod user;
pub mod vehicle;
