use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{
    AssignVehicleRequest, ChangeStatusRequest, CreateBookingRequest, UpdateAssignmentRequest,
    UpdateBookingRequest,
};
use crate::domain::models::audit::{AuditAction, AuditEntry};
use crate::domain::models::booking::{
    Booking, BookingStatus, BookingVehicle, NewBookingParams, RATE_TOTAL, RATE_TYPES,
};
use crate::domain::models::vehicle;
use crate::domain::services::authorization::{authorize, ensure_org_member, Capability};
use crate::domain::services::availability::{find_conflicts, validate_range};
use crate::domain::services::lifecycle::validate_transition;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Duration, Utc};
use uuid::Uuid;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;
    validate_range(payload.start_at, payload.end_at)?;

    let booking = Booking::new(NewBookingParams {
        org_id: org_id.clone(),
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        trip_type: payload.trip_type,
        start_at: payload.start_at,
        end_at: payload.end_at,
        pickup_location: payload.pickup_location,
        dropoff_location: payload.dropoff_location,
        notes: payload.notes,
        created_by: actor.0.id.clone(),
    });

    let audit = AuditEntry::new(
        org_id,
        booking.id.clone(),
        AuditAction::Created,
        actor.0.id,
        None,
        serde_json::to_string(&booking).ok(),
    );

    let created = state.booking_repo.create(&booking, audit).await?;

    info!("Booking created: {} ({})", created.id, created.reference);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;

    let bookings = state.booking_repo.list_by_org(&org_id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;

    let booking = state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let assignments = state.booking_repo.list_assignments(&org_id, &booking_id).await?;

    Ok(Json(serde_json::json!({
        "booking": booking,
        "vehicles": assignments
    })))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let mut booking = state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status().is_terminal() {
        return Err(AppError::Conflict(format!(
            "Booking is {} and cannot be edited",
            booking.status
        )));
    }

    let before = serde_json::to_string(&booking).ok();

    let new_start = payload.start_at.unwrap_or(booking.start_at);
    let new_end = payload.end_at.unwrap_or(booking.end_at);
    let dates_changed = new_start != booking.start_at || new_end != booking.end_at;

    if let Some(name) = payload.customer_name {
        booking.customer_name = name;
    }
    if let Some(phone) = payload.customer_phone {
        booking.customer_phone = Some(phone);
    }
    if let Some(trip_type) = payload.trip_type {
        booking.trip_type = Some(trip_type);
    }
    if let Some(pickup) = payload.pickup_location {
        booking.pickup_location = Some(pickup);
    }
    if let Some(dropoff) = payload.dropoff_location {
        booking.dropoff_location = Some(dropoff);
    }
    if let Some(notes) = payload.notes {
        booking.notes = Some(notes);
    }
    booking.updated_by = Some(actor.0.id.clone());
    booking.updated_at = Utc::now();

    // Date moves drag every vehicle assignment along and therefore
    // re-validate non-overlap inside the repository transaction.
    let updated = if dates_changed {
        validate_range(new_start, new_end)?;

        let gap = Duration::minutes(state.config.gap_buffer_minutes);
        let audit = AuditEntry::new(
            org_id,
            booking.id.clone(),
            AuditAction::DateChanged,
            actor.0.id,
            before,
            Some(serde_json::json!({ "start_at": new_start, "end_at": new_end }).to_string()),
        );

        state.booking_repo.update_dates(&booking, new_start, new_end, gap, audit).await?
    } else {
        let audit = AuditEntry::new(
            org_id,
            booking.id.clone(),
            AuditAction::Updated,
            actor.0.id,
            before,
            serde_json::to_string(&booking).ok(),
        );

        state.booking_repo.update_details(&booking, audit).await?
    };

    info!("Booking updated: {}", booking_id);

    Ok(Json(updated))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let target = BookingStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", payload.status)))?;

    let booking = state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let current = booking.status();
    validate_transition(current, target)?;

    // Re-entering a blocking state from one that was already blocking keeps
    // the same reservations, but check anyway so a conflicting booking that
    // slipped in cannot be confirmed over another one.
    if target.is_blocking() {
        let gap = Duration::minutes(state.config.gap_buffer_minutes);
        let assignments = state.booking_repo.list_assignments(&org_id, &booking_id).await?;

        for assignment in &assignments {
            let rows = state.booking_repo
                .blocking_rows(&org_id, &assignment.vehicle_id, Some(&booking_id))
                .await?;

            let conflicts = find_conflicts(&rows, assignment.start_at, assignment.end_at, gap);
            if let Some(conflict) = conflicts.into_iter().next() {
                return Err(AppError::BookingConflict(conflict));
            }
        }
    }

    let audit = AuditEntry::new(
        org_id.clone(),
        booking_id.clone(),
        AuditAction::StatusChanged,
        actor.0.id,
        Some(serde_json::json!({ "status": current.as_str() }).to_string()),
        Some(serde_json::json!({ "status": target.as_str() }).to_string()),
    );

    let updated = state.booking_repo.set_status(&org_id, &booking_id, target, audit).await?;

    info!("Booking {} moved {} -> {}", booking_id, current.as_str(), target.as_str());

    Ok(Json(updated))
}

/// DELETE on a booking cancels it. Cancelled bookings stay on record and
/// stop blocking their vehicles.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let booking = state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let current = booking.status();
    validate_transition(current, BookingStatus::Cancelled)?;

    let audit = AuditEntry::new(
        org_id.clone(),
        booking_id.clone(),
        AuditAction::StatusChanged,
        actor.0.id,
        Some(serde_json::json!({ "status": current.as_str() }).to_string()),
        Some(serde_json::json!({ "status": BookingStatus::Cancelled.as_str() }).to_string()),
    );

    let updated = state.booking_repo
        .set_status(&org_id, &booking_id, BookingStatus::Cancelled, audit)
        .await?;

    info!("Booking cancelled: {}", booking_id);

    Ok(Json(updated))
}

pub async fn assign_vehicle(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<AssignVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let booking = state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status().is_terminal() {
        return Err(AppError::Conflict(format!(
            "Booking is {} and cannot take vehicles",
            booking.status
        )));
    }

    let found_vehicle = state.vehicle_repo.find_by_id(&org_id, &payload.vehicle_id).await?
        .ok_or_else(|| AppError::VehicleNotFound(payload.vehicle_id.clone()))?;

    if found_vehicle.status != vehicle::VEHICLE_ACTIVE {
        return Err(AppError::Conflict(format!(
            "Vehicle {} is inactive",
            found_vehicle.vehicle_number
        )));
    }

    // Assignment interval defaults to the booking dates.
    let start_at = payload.start_at.unwrap_or(booking.start_at);
    let end_at = payload.end_at.unwrap_or(booking.end_at);
    validate_range(start_at, end_at)?;

    let rate_type = payload.rate_type.unwrap_or_else(|| RATE_TOTAL.to_string());
    if !RATE_TYPES.contains(&rate_type.as_str()) {
        return Err(AppError::Validation(format!("Unknown rate type: {}", rate_type)));
    }
    let total_amount = BookingVehicle::computed_total(
        &rate_type,
        payload.rate_per_day,
        payload.total_amount,
        start_at,
        end_at,
    );

    let assignment = BookingVehicle {
        id: Uuid::new_v4().to_string(),
        org_id: org_id.clone(),
        booking_id: booking_id.clone(),
        vehicle_id: found_vehicle.id.clone(),
        start_at,
        end_at,
        driver_name: payload.driver_name,
        driver_phone: payload.driver_phone,
        rate_type,
        rate_per_day: payload.rate_per_day,
        rate_per_km: payload.rate_per_km,
        total_amount,
        advance_amount: payload.advance_amount.unwrap_or(0),
        payment_status: "UNPAID".to_string(),
        created_by: actor.0.id.clone(),
        created_at: Utc::now(),
    };

    let gap = Duration::minutes(state.config.gap_buffer_minutes);
    let audit = AuditEntry::new(
        org_id,
        booking_id.clone(),
        AuditAction::VehicleAssigned,
        actor.0.id,
        None,
        serde_json::to_string(&assignment).ok(),
    );

    let created = state.booking_repo.assign_vehicle(&assignment, gap, audit).await?;

    info!(
        "Vehicle {} assigned to booking {}",
        found_vehicle.vehicle_number, booking_id
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_assignment(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id, assignment_id)): Path<(String, String, String)>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let mut assignment = state.booking_repo.find_assignment(&org_id, &assignment_id).await?
        .ok_or(AppError::NotFound("Assignment not found".into()))?;

    if assignment.booking_id != booking_id {
        return Err(AppError::NotFound("Assignment not found".into()));
    }

    let before = serde_json::to_string(&assignment).ok();

    if let Some(name) = payload.driver_name {
        assignment.driver_name = Some(name);
    }
    if let Some(phone) = payload.driver_phone {
        assignment.driver_phone = Some(phone);
    }
    if let Some(rate_type) = payload.rate_type {
        if !RATE_TYPES.contains(&rate_type.as_str()) {
            return Err(AppError::Validation(format!("Unknown rate type: {}", rate_type)));
        }
        assignment.rate_type = rate_type;
    }
    if let Some(rate) = payload.rate_per_day {
        assignment.rate_per_day = Some(rate);
    }
    if let Some(rate) = payload.rate_per_km {
        assignment.rate_per_km = Some(rate);
    }
    if let Some(advance) = payload.advance_amount {
        assignment.advance_amount = advance;
    }
    if let Some(status) = payload.payment_status {
        assignment.payment_status = status;
    }

    assignment.total_amount = BookingVehicle::computed_total(
        &assignment.rate_type,
        assignment.rate_per_day,
        payload.total_amount.or(Some(assignment.total_amount)),
        assignment.start_at,
        assignment.end_at,
    );

    let audit = AuditEntry::new(
        org_id,
        booking_id,
        AuditAction::RateChanged,
        actor.0.id,
        before,
        serde_json::to_string(&assignment).ok(),
    );

    let updated = state.booking_repo.update_assignment(&assignment, audit).await?;

    info!("Assignment updated: {}", assignment_id);

    Ok(Json(updated))
}

pub async fn remove_vehicle(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id, assignment_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageBookings)?;

    let assignment = state.booking_repo.find_assignment(&org_id, &assignment_id).await?
        .ok_or(AppError::NotFound("Assignment not found".into()))?;

    if assignment.booking_id != booking_id {
        return Err(AppError::NotFound("Assignment not found".into()));
    }

    let audit = AuditEntry::new(
        org_id.clone(),
        booking_id.clone(),
        AuditAction::VehicleRemoved,
        actor.0.id,
        serde_json::to_string(&assignment).ok(),
        None,
    );

    state.booking_repo.remove_vehicle(&org_id, &booking_id, &assignment_id, audit).await?;

    info!("Vehicle assignment {} removed from booking {}", assignment_id, booking_id);

    Ok(Json(serde_json::json!({"status": "removed"})))
}

pub async fn list_audit(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;

    state.booking_repo.find_by_id(&org_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let entries = state.audit_repo.list_by_booking(&org_id, &booking_id).await?;
    Ok(Json(entries))
}
