use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateOrganizationRequest, UpdateOrganizationRequest, JoinOrganizationRequest},
    responses::OrgCreatedResponse
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{organization::Organization, user::{self, User}};
use crate::domain::services::authorization::{authorize, Capability};
use std::sync::Arc;
use crate::error::AppError;
use rand::{distributions::Alphanumeric, Rng};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tracing::info;

pub async fn create_organization(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut org = Organization::new(payload.name, payload.slug);
    if let Some(address) = payload.address {
        org.address = Some(address);
    }

    let created_org = state.org_repo.create(&org).await?;

    info!("Organization created: {}", created_org.id);

    let admin_password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let password_hash = hash_password(&admin_password)?;

    let admin_user = User::new(created_org.id.clone(), "admin".to_string(), password_hash, user::ROLE_ADMIN);
    state.user_repo.create(&admin_user).await?;

    Ok(Json(OrgCreatedResponse {
        org_id: created_org.id,
        admin_username: "admin".to_string(),
        admin_secret: admin_password,
    }))
}

pub async fn get_organization_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let org = state.org_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Organization not found".into()))?;

    Ok(Json(org))
}

pub async fn get_current_organization(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let org_id = user.0.org_id;
    let org = state.org_repo.find_by_id(&org_id).await?
        .ok_or(AppError::NotFound("Organization not found".into()))?;
    Ok(Json(org))
}

pub async fn update_organization(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user.0, Capability::ManageOrganization)?;

    let org_id = user.0.org_id;
    let mut org = state.org_repo.find_by_id(&org_id).await?
        .ok_or(AppError::NotFound("Organization not found".into()))?;

    if let Some(name) = payload.name {
        org.name = name;
    }
    if let Some(address) = payload.address {
        org.address = Some(address);
    }

    let updated = state.org_repo.update(&org).await?;
    info!("Organization updated: {}", org_id);
    Ok(Json(updated))
}

/// Public join request. The account lands in PENDING and cannot sign in
/// until an admin approves it.
pub async fn join_organization(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<String>,
    Json(payload): Json<JoinOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.org_repo.find_by_id(&org_id).await?
        .ok_or(AppError::NotFound("Organization not found".into()))?;

    let password_hash = hash_password(&payload.password)?;

    let pending = User::pending(org_id, payload.username, password_hash);
    state.user_repo.create(&pending).await?;

    info!("Join request created: {}", pending.id);

    Ok(StatusCode::CREATED)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}
