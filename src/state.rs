use std::sync::Arc;
use crate::domain::ports::{
    AuditRepository, AuthRepository, BookingRepository, OrganizationRepository,
    TransferRepository, UserRepository, VehicleRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub org_repo: Arc<dyn OrganizationRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub vehicle_repo: Arc<dyn VehicleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub transfer_repo: Arc<dyn TransferRepository>,
    pub audit_repo: Arc<dyn AuditRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
}
