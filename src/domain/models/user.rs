use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MANAGER: &str = "MANAGER";
pub const ROLE_MEMBER: &str = "MEMBER";

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_PENDING: &str = "PENDING";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub org_id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(org_id: String, username: String, password_hash: String, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id,
            username,
            password_hash,
            role: role.to_string(),
            status: STATUS_ACTIVE.to_string(),
            created_at: Utc::now(),
        }
    }

    /// A join request: member role, inactive until an admin approves.
    pub fn pending(org_id: String, username: String, password_hash: String) -> Self {
        let mut user = Self::new(org_id, username, password_hash, ROLE_MEMBER);
        user.status = STATUS_PENDING.to_string();
        user
    }
}
