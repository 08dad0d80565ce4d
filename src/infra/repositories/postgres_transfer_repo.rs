use crate::domain::{models::transfer::CashTransfer, ports::TransferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTransferRepo {
    pool: PgPool,
}

impl PostgresTransferRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferRepository for PostgresTransferRepo {
    async fn create(&self, transfer: &CashTransfer) -> Result<CashTransfer, AppError> {
        sqlx::query_as::<_, CashTransfer>(
            "INSERT INTO cash_transfers (id, org_id, booking_id, amount, method, transferred_at, note, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&transfer.id)
            .bind(&transfer.org_id)
            .bind(&transfer.booking_id)
            .bind(transfer.amount)
            .bind(&transfer.method)
            .bind(transfer.transferred_at)
            .bind(&transfer.note)
            .bind(&transfer.created_by)
            .bind(transfer.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_org(&self, org_id: &str) -> Result<Vec<CashTransfer>, AppError> {
        sqlx::query_as::<_, CashTransfer>(
            "SELECT * FROM cash_transfers WHERE org_id = $1 ORDER BY transferred_at DESC"
        )
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<CashTransfer>, AppError> {
        sqlx::query_as::<_, CashTransfer>("SELECT * FROM cash_transfers WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, org_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cash_transfers WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transfer not found".into()));
        }
        Ok(())
    }
}
