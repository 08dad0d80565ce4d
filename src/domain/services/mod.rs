pub mod auth_service;
pub mod authorization;
pub mod availability;
pub mod lifecycle;
