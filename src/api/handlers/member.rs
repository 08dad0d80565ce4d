use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::CreateMemberRequest;
use crate::api::handlers::organization::hash_password;
use crate::domain::models::user::{self, User};
use crate::domain::services::authorization::{authorize, ensure_org_member, Capability};
use std::sync::Arc;
use crate::error::AppError;
use tracing::{info, error};

pub async fn create_member(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageMembers)?;

    if state.user_repo.find_by_username(&org_id, &payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let role = match payload.role.as_deref() {
        None => user::ROLE_MEMBER,
        Some(user::ROLE_MANAGER) => user::ROLE_MANAGER,
        Some(user::ROLE_MEMBER) => user::ROLE_MEMBER,
        Some(other) => return Err(AppError::Validation(format!("Unknown role: {}", other))),
    };

    let password_hash = hash_password(&payload.password)?;

    let new_user = User::new(org_id, payload.username, password_hash, role);
    let created = state.user_repo.create(&new_user).await?;

    info!("Created member user: {}", created.id);

    Ok(Json(serde_json::json!({
        "id": created.id,
        "username": created.username,
        "role": created.role,
        "status": created.status,
        "created_at": created.created_at
    })))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageMembers)?;

    let members = state.user_repo.list_by_org(&org_id).await?;
    let safe_members: Vec<_> = members.into_iter().map(|u| serde_json::json!({
        "id": u.id,
        "username": u.username,
        "role": u.role,
        "status": u.status,
        "created_at": u.created_at
    })).collect();

    Ok(Json(safe_members))
}

/// Flip a PENDING join request to ACTIVE.
pub async fn approve_member(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageMembers)?;

    state.user_repo.find_by_id(&org_id, &user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let approved = state.user_repo.set_status(&org_id, &user_id, user::STATUS_ACTIVE).await?;

    info!("Approved member {}", user_id);

    Ok(Json(serde_json::json!({
        "id": approved.id,
        "username": approved.username,
        "status": approved.status
    })))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    actor: AuthUser,
    Path((_, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_org_member(&actor.0, &org_id)?;
    authorize(&actor.0, Capability::ManageMembers)?;

    if actor.0.id == user_id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    let target = state.user_repo.find_by_id(&org_id, &user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    match state.user_repo.delete(&org_id, &target.id).await {
        Ok(_) => {
            info!("Deleted user {}", user_id);
            Ok(Json(serde_json::json!({"status": "deleted"})))
        },
        Err(e) => {
            error!("Failed to delete user {}: {:?}", user_id, e);
            Err(e)
        }
    }
}
