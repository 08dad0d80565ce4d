use crate::domain::{models::vehicle::{Vehicle, VEHICLE_ACTIVE}, ports::VehicleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteVehicleRepo {
    pool: SqlitePool,
}

impl SqliteVehicleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for SqliteVehicleRepo {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles (id, org_id, vehicle_number, make_model, status, odometer_km, service_due_km, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE org_id = ? AND id = ?")
            .bind(org_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE org_id = ? ORDER BY vehicle_number ASC")
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, org_id: &str) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE org_id = ? AND status = ? ORDER BY vehicle_number ASC"
        )
            .bind(org_id)
            .bind(VEHICLE_ACTIVE)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET vehicle_number=?, make_model=?, status=?, service_due_km=? WHERE id=? AND org_id=? RETURNING *"
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
            "UPDATE vehicles SET odometer_km = ? WHERE org_id = ? AND id = ? RETURNING *"
        )
            .bind(odometer_km)
            .bind(org_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
