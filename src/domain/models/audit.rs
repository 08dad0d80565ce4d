use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Append-only audit trail entry for a booking. Written in the same
/// transaction as the mutation it records; never updated or deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub org_id: String,
    pub booking_id: String,
    pub action: String,
    pub actor_id: String,
    pub before_json: Option<String>,
    pub after_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    VehicleAssigned,
    VehicleRemoved,
    DateChanged,
    RateChanged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::StatusChanged => "status_changed",
            AuditAction::VehicleAssigned => "vehicle_assigned",
            AuditAction::VehicleRemoved => "vehicle_removed",
            AuditAction::DateChanged => "date_changed",
            AuditAction::RateChanged => "rate_changed",
        }
    }
}

impl AuditEntry {
    pub fn new(
        org_id: String,
        booking_id: String,
        action: AuditAction,
        actor_id: String,
        before_json: Option<String>,
        after_json: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id,
            booking_id,
            action: action.as_str().to_string(),
            actor_id,
            before_json,
            after_json,
            created_at: Utc::now(),
        }
    }
}
