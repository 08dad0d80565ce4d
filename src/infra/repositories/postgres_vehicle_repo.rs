use crate::domain::{models::vehicle::{Vehicle, VEHICLE_ACTIVE}, ports::VehicleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVehicleRepo {
    pool: PgPool,
}

impl PostgresVehicleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PostgresVehicleRepo {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles (id, org_id, vehicle_number, make_model, status, odometer_km, service_due_km, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&vehicle.id)
            .bind(&vehicle.org_id)
            .bind(&vehicle.vehicle_number)
            .bind(&vehicle.make_model)
            .bind(&vehicle.status)
            .bind(vehicle.odometer_km)
            .bind(vehicle.service_due_km)
            .bind(vehicle.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE org_id = $1 ORDER BY vehicle_number ASC")
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE org_id = $1 AND status = $2 ORDER BY vehicle_number ASC"
        )
            .bind(org_id)
            .bind(VEHICLE_ACTIVE)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET vehicle_number=$1, make_model=$2, status=$3, service_due_km=$4 WHERE id=$5 AND org_id=$6 RETURNING *"
        )
            .bind(&vehicle.vehicle_number)
            .bind(&vehicle.make_model)
            .bind(&vehicle.status)
            .bind(vehicle.service_due_km)
            .bind(&vehicle.id)
            .bind(&vehicle.org_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_odometer(&self, org_id: &str, id: &str, odometer_km: i64) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET odometer_km = $1 WHERE org_id = $2 AND id = $3 RETURNING *"
        )
            .bind(odometer_km)
            .bind(org_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
