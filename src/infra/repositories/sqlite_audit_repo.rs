use crate::domain::{models::audit::AuditEntry, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Read-only view over the audit trail. Entries are inserted by the booking
/// repository inside its mutation transactions.
pub struct SqliteAuditRepo {
    pool: SqlitePool,
}

impl SqliteAuditRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for SqliteAuditRepo {
    async fn list_by_booking(&self, org_id: &str, booking_id: &str) -> Result<Vec<AuditEntry>, AppError> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM booking_audit WHERE org_id = ? AND booking_id = ? ORDER BY created_at ASC"
        )
            .bind(org_id)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
