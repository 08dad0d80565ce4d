use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{CreateVehicleRequest, UpdateVehicleRequest, OdometerRequest};
use crate::domain::models::vehicle::{self, Vehicle};
use crate::domain::services::authorization::{authorize, ensure_org_member, Capability};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageFleet)?;

    let mut new_vehicle = Vehicle::new(org_id, payload.vehicle_number, payload.make_model);
    new_vehicle.service_due_km = payload.service_due_km;

    let created = state.vehicle_repo.create(&new_vehicle).await?;

    info!("Vehicle created: {} ({})", created.id, created.vehicle_number);

    Ok(Json(created))
}

pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;

    let vehicles = state.vehicle_repo.list(&org_id).await?;

    let with_flags: Vec<_> = vehicles.into_iter().map(|v| {
        let service_due = v.service_due();
        serde_json::json!({
            "id": v.id,
            "vehicle_number": v.vehicle_number,
            "make_model": v.make_model,
            "status": v.status,
            "odometer_km": v.odometer_km,
            "service_due_km": v.service_due_km,
            "service_due": service_due,
            "created_at": v.created_at
        })
    }).collect();

    Ok(Json(with_flags))
}

pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, vehicle_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;

    let found = state.vehicle_repo.find_by_id(&org_id, &vehicle_id).await?
        .ok_or(AppError::VehicleNotFound(vehicle_id))?;

    Ok(Json(found))
}

pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, vehicle_id)): Path<(String, String)>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageFleet)?;

    let mut found = state.vehicle_repo.find_by_id(&org_id, &vehicle_id).await?
        .ok_or(AppError::VehicleNotFound(vehicle_id.clone()))?;

    if let Some(make_model) = payload.make_model {
        found.make_model = make_model;
    }
    if let Some(status) = payload.status {
        if status != vehicle::VEHICLE_ACTIVE && status != vehicle::VEHICLE_INACTIVE {
            return Err(AppError::Validation(format!("Unknown vehicle status: {}", status)));
        }
        found.status = status;
    }
    if let Some(due) = payload.service_due_km {
        found.service_due_km = Some(due);
    }

    let updated = state.vehicle_repo.update(&found).await?;
    info!("Vehicle updated: {}", vehicle_id);
    Ok(Json(updated))
}

pub async fn set_odometer(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, vehicle_id)): Path<(String, String)>,
    Json(payload): Json<OdometerRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageFleet)?;

    let found = state.vehicle_repo.find_by_id(&org_id, &vehicle_id).await?
        .ok_or(AppError::VehicleNotFound(vehicle_id.clone()))?;

    // Odometers only move forward.
    if payload.odometer_km < found.odometer_km {
        return Err(AppError::Validation(format!(
            "Odometer cannot go backwards ({} -> {})",
            found.odometer_km, payload.odometer_km
        )));
    }

    let updated = state.vehicle_repo.set_odometer(&org_id, &vehicle_id, payload.odometer_km).await?;

    if updated.service_due() {
        info!("Vehicle {} is due for service at {} km", updated.vehicle_number, updated.odometer_km);
    }

    Ok(Json(updated))
}
