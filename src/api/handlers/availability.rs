use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::{
    requests::AvailabilityRequest,
    responses::{AvailabilityResponse, VehicleAvailability},
};
use crate::domain::services::authorization::ensure_org_member;
use crate::domain::services::availability::{find_conflicts, validate_range};
use std::sync::Arc;
use chrono::Duration;
use crate::error::AppError;

/// Read-only availability check for a set of vehicles over a range. Never
/// mutates state; booking writes re-validate on their own before committing.
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    validate_range(payload.start_at, payload.end_at)?;

    let gap_minutes = payload.gap_minutes.unwrap_or(state.config.gap_buffer_minutes);
    if gap_minutes < 0 {
        return Err(AppError::Validation("gap_minutes cannot be negative".to_string()));
    }
    let gap = Duration::minutes(gap_minutes);

    // Absent or empty vehicle_ids means the whole active fleet.
    let candidates: Vec<(String, Option<String>)> = match payload.vehicle_ids.as_deref() {
        Some(ids) if !ids.is_empty() => {
            let mut resolved = Vec::with_capacity(ids.len());
            for id in ids {
                let number = state.vehicle_repo.find_by_id(&org_id, id).await?
                    .map(|v| v.vehicle_number);
                resolved.push((id.clone(), number));
            }
            resolved
        }
        _ => state.vehicle_repo.list_active(&org_id).await?
            .into_iter()
            .map(|v| (v.id, Some(v.vehicle_number)))
            .collect(),
    };

    let mut results = Vec::with_capacity(candidates.len());

    for (vehicle_id, vehicle_number) in candidates {
        // Unknown ids get a per-entry error, the rest still gets checked.
        if vehicle_number.is_none() {
            results.push(VehicleAvailability {
                vehicle_id,
                vehicle_number: None,
                is_available: false,
                conflict: None,
                error: Some("Vehicle not found".to_string()),
            });
            continue;
        }

        let rows = state.booking_repo
            .blocking_rows(&org_id, &vehicle_id, payload.exclude_booking_id.as_deref())
            .await?;

        let conflicts = find_conflicts(&rows, payload.start_at, payload.end_at, gap);
        let first = conflicts.into_iter().next();

        results.push(VehicleAvailability {
            vehicle_id,
            vehicle_number,
            is_available: first.is_none(),
            conflict: first,
            error: None,
        });
    }

    Ok(Json(AvailabilityResponse { results }))
}
