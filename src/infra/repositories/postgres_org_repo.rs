use crate::domain::{models::organization::Organization, ports::OrganizationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOrgRepo {
    pool: PgPool,
}

impl PostgresOrgRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrgRepo {
    async fn create(&self, org: &Organization) -> Result<Organization, AppError> {
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (id, name, slug, address, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&org.id)
            .bind(&org.name)
            .bind(&org.slug)
            .bind(&org.address)
            .bind(org.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>, AppError> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, AppError> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, org: &Organization) -> Result<Organization, AppError> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET name=$1, address=$2 WHERE id=$3 RETURNING *"
        )
            .bind(&org.name)
            .bind(&org.address)
            .bind(&org.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
