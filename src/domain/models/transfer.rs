use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Cash moved between drivers, office and bank. Amounts in minor units.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CashTransfer {
    pub id: String,
    pub org_id: String,
    pub booking_id: Option<String>,
    pub amount: i64,
    pub method: String,
    pub transferred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewTransferParams {
    pub org_id: String,
    pub booking_id: Option<String>,
    pub amount: i64,
    pub method: String,
    pub transferred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: String,
}

impl CashTransfer {
    pub fn new(params: NewTransferParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id: params.org_id,
            booking_id: params.booking_id,
            amount: params.amount,
            method: params.method,
            transferred_at: params.transferred_at,
            note: params.note,
            created_by: params.created_by,
            created_at: Utc::now(),
        }
    }
}
