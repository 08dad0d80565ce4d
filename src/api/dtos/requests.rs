use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateMemberRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct JoinOrganizationRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub org_slug: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub vehicle_number: String,
    pub make_model: String,
    pub service_due_km: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateVehicleRequest {
    pub make_model: Option<String>,
    pub status: Option<String>,
    pub service_due_km: Option<i64>,
}

#[derive(Deserialize)]
pub struct OdometerRequest {
    pub odometer_km: i64,
}

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub vehicle_ids: Option<Vec<String>>,
    pub exclude_booking_id: Option<String>,
    pub gap_minutes: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub trip_type: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub trip_type: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct AssignVehicleRequest {
    pub vehicle_id: String,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub rate_type: Option<String>,
    pub rate_per_day: Option<i64>,
    pub rate_per_km: Option<i64>,
    pub total_amount: Option<i64>,
    pub advance_amount: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateAssignmentRequest {
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub rate_type: Option<String>,
    pub rate_per_day: Option<i64>,
    pub rate_per_km: Option<i64>,
    pub total_amount: Option<i64>,
    pub advance_amount: Option<i64>,
    pub payment_status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTransferRequest {
    pub booking_id: Option<String>,
    pub amount: i64,
    pub method: String,
    pub transferred_at: DateTime<Utc>,
    pub note: Option<String>,
}
