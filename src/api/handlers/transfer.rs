use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::CreateTransferRequest;
use crate::domain::models::transfer::{CashTransfer, NewTransferParams};
use crate::domain::services::authorization::{authorize, ensure_org_member, Capability};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::RecordTransfers)?;

    if payload.amount <= 0 {
        return Err(AppError::Validation("Amount must be positive".into()));
    }

    // A transfer may reference a booking, in which case it must exist.
    if let Some(ref booking_id) = payload.booking_id {
        state.booking_repo.find_by_id(&org_id, booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;
    }

    let transfer = CashTransfer::new(NewTransferParams {
        org_id,
        booking_id: payload.booking_id,
        amount: payload.amount,
        method: payload.method,
        transferred_at: payload.transferred_at,
        note: payload.note,
        created_by: actor.0.id,
    });

    let created = state.transfer_repo.create(&transfer).await?;

    info!("Cash transfer recorded: {} ({})", created.id, created.amount);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::RecordTransfers)?;

    let transfers = state.transfer_repo.list_by_org(&org_id).await?;
    Ok(Json(transfers))
}

pub async fn delete_transfer(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, transfer_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::RecordTransfers)?;

    state.transfer_repo.find_by_id(&org_id, &transfer_id).await?
        .ok_or(AppError::NotFound("Transfer not found".into()))?;

    state.transfer_repo.delete(&org_id, &transfer_id).await?;

    info!("Cash transfer deleted: {}", transfer_id);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}
