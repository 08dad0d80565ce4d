use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, availability, booking, health, member, organization, transfer, vehicle};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Organization Public
        .route("/api/v1/orgs/by-slug/{slug}", get(organization::get_organization_by_slug))
        .route("/api/v1/orgs/{org_id}/join", post(organization::join_organization))

        // Organization Admin
        .route("/api/v1/orgs", post(organization::create_organization).put(organization::update_organization).get(organization::get_current_organization))
        .route("/api/v1/{org_id}/members", post(member::create_member).get(member::list_members))
        .route("/api/v1/{org_id}/members/{user_id}", delete(member::delete_member))
        .route("/api/v1/{org_id}/members/{user_id}/approve", post(member::approve_member))

        // Fleet
        .route("/api/v1/{org_id}/vehicles", post(vehicle::create_vehicle).get(vehicle::list_vehicles))
        .route("/api/v1/{org_id}/vehicles/{vehicle_id}", get(vehicle::get_vehicle).put(vehicle::update_vehicle))
        .route("/api/v1/{org_id}/vehicles/{vehicle_id}/odometer", put(vehicle::set_odometer))

        // Availability
        .route("/api/v1/{org_id}/availability", post(availability::check_availability))

        // Bookings
        .route("/api/v1/{org_id}/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/{org_id}/bookings/{booking_id}", get(booking::get_booking).put(booking::update_booking).delete(booking::cancel_booking))
        .route("/api/v1/{org_id}/bookings/{booking_id}/status", post(booking::change_status))
        .route("/api/v1/{org_id}/bookings/{booking_id}/vehicles", post(booking::assign_vehicle))
        .route("/api/v1/{org_id}/bookings/{booking_id}/vehicles/{assignment_id}", put(booking::update_assignment).delete(booking::remove_vehicle))
        .route("/api/v1/{org_id}/bookings/{booking_id}/audit", get(booking::list_audit))

        // Cash Transfers
        .route("/api/v1/{org_id}/transfers", post(transfer::create_transfer).get(transfer::list_transfers))
        .route("/api/v1/{org_id}/transfers/{transfer_id}", delete(transfer::delete_transfer))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        org_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
