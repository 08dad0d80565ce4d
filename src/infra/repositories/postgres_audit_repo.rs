use crate::domain::{models::audit::AuditEntry, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAuditRepo {
    pool: PgPool,
}

impl PostgresAuditRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepo {
    async fn list_by_booking(&self, org_id: &str, booking_id: &str) -> Result<Vec<AuditEntry>, AppError> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM booking_audit WHERE org_id = $1 AND booking_id = $2 ORDER BY created_at ASC"
        )
            .bind(org_id)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
