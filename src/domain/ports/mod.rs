use crate::domain::models::{
    audit::AuditEntry,
    auth::RefreshTokenRecord,
    booking::{BlockingRow, Booking, BookingStatus, BookingVehicle},
    organization::Organization,
    transfer::CashTransfer,
    user::User,
    vehicle::Vehicle,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(&self, org: &Organization) -> Result<Organization, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, AppError>;
    async fn update(&self, org: &Organization) -> Result<Organization, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, org_id: &str, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<User>, AppError>;
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<User>, AppError>;
    async fn set_status(&self, org_id: &str, id: &str, status: &str) -> Result<User, AppError>;
    async fn delete(&self, org_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Vehicle>, AppError>;
    async fn list(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError>;
    async fn list_active(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError>;
    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
    async fn set_odometer(&self, org_id: &str, id: &str, odometer_km: i64) -> Result<Vehicle, AppError>;
}

/// Bookings, their vehicle assignments and the audit trail live in one
/// aggregate: every mutating call takes the audit entry it must persist in
/// the same transaction. The write paths that create or move blocking
/// intervals re-validate non-overlap against committed state inside that
/// transaction and fail with `BookingConflict` when they lose a race.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking, audit: AuditEntry) -> Result<Booking, AppError>;
    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn update_details(&self, booking: &Booking, audit: AuditEntry) -> Result<Booking, AppError>;
    async fn set_status(&self, org_id: &str, id: &str, status: BookingStatus, audit: AuditEntry) -> Result<Booking, AppError>;
    async fn update_dates(
        &self,
        booking: &Booking,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        gap: Duration,
        audit: AuditEntry,
    ) -> Result<Booking, AppError>;
    async fn assign_vehicle(&self, assignment: &BookingVehicle, gap: Duration, audit: AuditEntry) -> Result<BookingVehicle, AppError>;
    async fn update_assignment(&self, assignment: &BookingVehicle, audit: AuditEntry) -> Result<BookingVehicle, AppError>;
    async fn remove_vehicle(&self, org_id: &str, booking_id: &str, assignment_id: &str, audit: AuditEntry) -> Result<(), AppError>;
    async fn find_assignment(&self, org_id: &str, assignment_id: &str) -> Result<Option<BookingVehicle>, AppError>;
    async fn list_assignments(&self, org_id: &str, booking_id: &str) -> Result<Vec<BookingVehicle>, AppError>;
    /// Every assignment interval on the vehicle whose parent booking is in a
    /// blocking status, joined with the booking reference and creator.
    async fn blocking_rows(&self, org_id: &str, vehicle_id: &str, exclude_booking: Option<&str>) -> Result<Vec<BlockingRow>, AppError>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn list_by_booking(&self, org_id: &str, booking_id: &str) -> Result<Vec<AuditEntry>, AppError>;
}

#[async_trait]
pub trait TransferRepository: Send + Sync {
    async fn create(&self, transfer: &CashTransfer) -> Result<CashTransfer, AppError>;
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<CashTransfer>, AppError>;
    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<CashTransfer>, AppError>;
    async fn delete(&self, org_id: &str, id: &str) -> Result<(), AppError>;
}
