pub mod postgres_audit_repo;
pub mod postgres_auth_repo;
pub mod postgres_booking_repo;
pub mod postgres_org_repo;
pub mod postgres_transfer_repo;
pub mod postgres_user_repo;
pub mod postgres_vehicle_repo;
pub mod sqlite_audit_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_org_repo;
pub mod sqlite_transfer_repo;
pub mod sqlite_user_repo;
pub mod sqlite_vehicle_repo;
