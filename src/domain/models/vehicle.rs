use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const VEHICLE_ACTIVE: &str = "ACTIVE";
pub const VEHICLE_INACTIVE: &str = "INACTIVE";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Vehicle {
    pub id: String,
    pub org_id: String,
    pub vehicle_number: String,
    pub make_model: String,
    pub status: String,
    pub odometer_km: i64,
    pub service_due_km: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(org_id: String, vehicle_number: String, make_model: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id,
            vehicle_number,
            make_model,
            status: VEHICLE_ACTIVE.to_string(),
            odometer_km: 0,
            service_due_km: None,
            created_at: Utc::now(),
        }
    }

    pub fn service_due(&self) -> bool {
        self.service_due_km.is_some_and(|due| self.odometer_km >= due)
    }
}
