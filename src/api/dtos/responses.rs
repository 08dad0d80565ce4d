use serde::Serialize;
use crate::error::ConflictDetails;

#[derive(Serialize)]
pub struct OrgCreatedResponse {
    pub org_id: String,
    pub admin_username: String,
    pub admin_secret: String,
}

/// Per-vehicle availability verdict. Unknown vehicle ids come back with
/// `error` set instead of failing the whole request.
#[derive(Serialize)]
pub struct VehicleAvailability {
    pub vehicle_id: String,
    pub vehicle_number: Option<String>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub results: Vec<VehicleAvailability>,
}
