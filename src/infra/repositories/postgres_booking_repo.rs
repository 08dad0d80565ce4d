use crate::domain::{
    models::{
        audit::AuditEntry,
        booking::{BlockingRow, Booking, BookingStatus, BookingVehicle},
    },
    ports::BookingRepository,
    services::availability::conflict_from_row,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_audit(tx: &mut Transaction<'_, Postgres>, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO booking_audit (id, org_id, booking_id, action, actor_id, before_json, after_json, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        )
            .bind(&entry.id).bind(&entry.org_id).bind(&entry.booking_id).bind(&entry.action)
            .bind(&entry.actor_id).bind(&entry.before_json).bind(&entry.after_json).bind(entry.created_at)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn first_conflict(
        &self,
        org_id: &str,
        vehicle_id: &str,
        exclude_booking: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        gap: Duration,
    ) -> Result<Option<BlockingRow>, AppError> {
        sqlx::query_as::<_, BlockingRow>(
            "SELECT b.id AS booking_id, b.reference, a.start_at, a.end_at,
                    COALESCE(u.username, 'unknown') AS booked_by
             FROM booking_vehicles a
             JOIN bookings b ON b.id = a.booking_id
             LEFT JOIN users u ON u.id = b.created_by
             WHERE a.org_id = $1 AND a.vehicle_id = $2 AND b.status NOT IN ('COMPLETED', 'CANCELLED')
               AND b.id != $3 AND a.start_at < $4 AND a.end_at > $5
             ORDER BY a.start_at ASC
             LIMIT 1"
        )
            .bind(org_id)
            .bind(vehicle_id)
            .bind(exclude_booking)
            .bind(end_at + gap)
            .bind(start_at - gap)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking, audit: AuditEntry) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, org_id, reference, status, customer_name, customer_phone, trip_type, start_at, end_at, pickup_location, dropoff_location, notes, created_by, updated_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.org_id).bind(&booking.reference).bind(&booking.status)
            .bind(&booking.customer_name).bind(&booking.customer_phone).bind(&booking.trip_type)
            .bind(booking.start_at).bind(booking.end_at).bind(&booking.pickup_location)
            .bind(&booking.dropoff_location).bind(&booking.notes).bind(&booking.created_by)
            .bind(&booking.updated_by).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE org_id = $1 AND id = $2")
            .bind(org_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE org_id = $1 ORDER BY start_at ASC")
            .bind(org_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_details(&self, booking: &Booking, audit: AuditEntry) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET customer_name=$1, customer_phone=$2, trip_type=$3, pickup_location=$4, dropoff_location=$5, notes=$6, updated_by=$7, updated_at=$8
             WHERE id=$9 AND org_id=$10
             RETURNING *"
        )
            .bind(&booking.customer_name).bind(&booking.customer_phone).bind(&booking.trip_type)
            .bind(&booking.pickup_location).bind(&booking.dropoff_location).bind(&booking.notes)
            .bind(&booking.updated_by).bind(Utc::now())
            .bind(&booking.id).bind(&booking.org_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn set_status(&self, org_id: &str, id: &str, status: BookingStatus, audit: AuditEntry) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=$1, updated_by=$2, updated_at=$3 WHERE id=$4 AND org_id=$5 RETURNING *"
        )
            .bind(status.as_str()).bind(&audit.actor_id).bind(Utc::now())
            .bind(id).bind(org_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn update_dates(
        &self,
        booking: &Booking,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        gap: Duration,
        audit: AuditEntry,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Serialize against concurrent writers on the same vehicles before
        // re-validating; ordered so two movers cannot deadlock.
        sqlx::query(
            "SELECT id FROM vehicles WHERE id IN (SELECT vehicle_id FROM booking_vehicles WHERE booking_id = $1) ORDER BY id FOR UPDATE"
        )
            .bind(&booking.id)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE booking_vehicles AS t SET start_at = $1, end_at = $2
             WHERE t.booking_id = $3 AND NOT EXISTS (
                 SELECT 1 FROM booking_vehicles a
                 JOIN bookings b ON b.id = a.booking_id
                 WHERE a.vehicle_id = t.vehicle_id AND b.status NOT IN ('COMPLETED', 'CANCELLED')
                   AND b.id != $3 AND a.start_at < $4 AND a.end_at > $5
             )"
        )
            .bind(new_start).bind(new_end).bind(&booking.id)
            .bind(new_end + gap).bind(new_start - gap)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let left_behind: Option<(String,)> = sqlx::query_as(
            "SELECT vehicle_id FROM booking_vehicles WHERE booking_id = $1 AND (start_at != $2 OR end_at != $3) LIMIT 1"
        )
            .bind(&booking.id).bind(new_start).bind(new_end)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        if let Some((vehicle_id,)) = left_behind {
            drop(tx);
            let conflict = self.first_conflict(&booking.org_id, &vehicle_id, &booking.id, new_start, new_end, gap).await?;
            return Err(match conflict {
                Some(row) => AppError::BookingConflict(conflict_from_row(&row, gap)),
                None => AppError::Conflict("Vehicle no longer available for the requested dates".into()),
            });
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET start_at=$1, end_at=$2, updated_by=$3, updated_at=$4 WHERE id=$5 AND org_id=$6 RETURNING *"
        )
            .bind(new_start).bind(new_end).bind(&audit.actor_id).bind(Utc::now())
            .bind(&booking.id).bind(&booking.org_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn assign_vehicle(&self, assignment: &BookingVehicle, gap: Duration, audit: AuditEntry) -> Result<BookingVehicle, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Lock the vehicle row so two racing requests serialize here and the
        // loser's NOT EXISTS guard sees the winner's committed insert.
        sqlx::query("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(&assignment.vehicle_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, BookingVehicle>(
            "INSERT INTO booking_vehicles (id, org_id, booking_id, vehicle_id, start_at, end_at, driver_name, driver_phone, rate_type, rate_per_day, rate_per_km, total_amount, advance_amount, payment_status, created_by, created_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16
             WHERE NOT EXISTS (
                 SELECT 1 FROM booking_vehicles a
                 JOIN bookings b ON b.id = a.booking_id
                 WHERE a.vehicle_id = $4 AND b.status NOT IN ('COMPLETED', 'CANCELLED')
                   AND b.id != $3 AND a.start_at < $17 AND a.end_at > $18
             )
             RETURNING *"
        )
            .bind(&assignment.id).bind(&assignment.org_id).bind(&assignment.booking_id).bind(&assignment.vehicle_id)
            .bind(assignment.start_at).bind(assignment.end_at).bind(&assignment.driver_name).bind(&assignment.driver_phone)
            .bind(&assignment.rate_type).bind(assignment.rate_per_day).bind(assignment.rate_per_km)
            .bind(assignment.total_amount).bind(assignment.advance_amount).bind(&assignment.payment_status)
            .bind(&assignment.created_by).bind(assignment.created_at)
            .bind(assignment.end_at + gap).bind(assignment.start_at - gap)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(created) = created else {
            drop(tx);
            let conflict = self
                .first_conflict(&assignment.org_id, &assignment.vehicle_id, &assignment.booking_id, assignment.start_at, assignment.end_at, gap)
                .await?;
            return Err(match conflict {
                Some(row) => AppError::BookingConflict(conflict_from_row(&row, gap)),
                None => AppError::Conflict("Vehicle no longer available for the requested dates".into()),
            });
        };

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update_assignment(&self, assignment: &BookingVehicle, audit: AuditEntry) -> Result<BookingVehicle, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, BookingVehicle>(
            "UPDATE booking_vehicles SET driver_name=$1, driver_phone=$2, rate_type=$3, rate_per_day=$4, rate_per_km=$5, total_amount=$6, advance_amount=$7, payment_status=$8
             WHERE id=$9 AND org_id=$10
             RETURNING *"
        )
            .bind(&assignment.driver_name).bind(&assignment.driver_phone).bind(&assignment.rate_type)
            .bind(assignment.rate_per_day).bind(assignment.rate_per_km).bind(assignment.total_amount)
            .bind(assignment.advance_amount).bind(&assignment.payment_status)
            .bind(&assignment.id).bind(&assignment.org_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn remove_vehicle(&self, org_id: &str, booking_id: &str, assignment_id: &str, audit: AuditEntry) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM booking_vehicles WHERE id = $1 AND booking_id = $2 AND org_id = $3")
            .bind(assignment_id).bind(booking_id).bind(org_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Assignment not found".into()));
        }

        Self::insert_audit(&mut tx, &audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_assignment(&self, org_id: &str, assignment_id: &str) -> Result<Option<BookingVehicle>, AppError> {
        sqlx::query_as::<_, BookingVehicle>("SELECT * FROM booking_vehicles WHERE org_id = $1 AND id = $2")
            .bind(org_id).bind(assignment_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_assignments(&self, org_id: &str, booking_id: &str) -> Result<Vec<BookingVehicle>, AppError> {
        sqlx::query_as::<_, BookingVehicle>(
            "SELECT * FROM booking_vehicles WHERE org_id = $1 AND booking_id = $2 ORDER BY created_at ASC"
        )
            .bind(org_id).bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn blocking_rows(&self, org_id: &str, vehicle_id: &str, exclude_booking: Option<&str>) -> Result<Vec<BlockingRow>, AppError> {
        sqlx::query_as::<_, BlockingRow>(
            "SELECT b.id AS booking_id, b.reference, a.start_at, a.end_at,
                    COALESCE(u.username, 'unknown') AS booked_by
             FROM booking_vehicles a
             JOIN bookings b ON b.id = a.booking_id
             LEFT JOIN users u ON u.id = b.created_by
             WHERE a.org_id = $1 AND a.vehicle_id = $2
               AND b.status NOT IN ('COMPLETED', 'CANCELLED')
               AND b.id != $3
             ORDER BY a.start_at ASC"
        )
            .bind(org_id)
            .bind(vehicle_id)
            .bind(exclude_booking.unwrap_or_default())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
