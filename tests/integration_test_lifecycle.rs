mod common;

use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::json;

fn apr2(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2027, 4, 2, h, m, 0).unwrap()
}

async fn setup(app: &TestApp, slug: &str) -> (String, AuthHeaders, String, String) {
    let (org_id, auth) = app.setup_org(slug).await;

    let (_, vehicle) = app.request(
        "POST",
        &format!("/api/v1/{}/vehicles", org_id),
        &auth,
        Some(json!({"vehicle_number": "KA-02-0001", "make_model": "Toyota Etios"})),
    ).await;
    let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

    let (status, booking) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings", org_id),
        &auth,
        Some(json!({
            "customer_name": "Ravi",
            "start_at": apr2(8, 0),
            "end_at": apr2(18, 0)
        })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], json!("INQUIRY"));

    (org_id, auth, vehicle_id, booking["id"].as_str().unwrap().to_string())
}

async fn set_status(app: &TestApp, org_id: &str, auth: &AuthHeaders, booking_id: &str, status: &str) -> StatusCode {
    let (code, _) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/status", org_id, booking_id),
        auth,
        Some(json!({"status": status})),
    ).await;
    code
}

#[tokio::test]
async fn test_forward_transitions_append_audit() {
    let app = TestApp::new().await;
    let (org_id, auth, _, booking_id) = setup(&app, "forward").await;

    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "TENTATIVE").await, StatusCode::OK);
    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "CONFIRMED").await, StatusCode::OK);

    let (status, audit) = app.request(
        "GET",
        &format!("/api/v1/{}/bookings/{}/audit", org_id, booking_id),
        &auth,
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);

    let actions: Vec<&str> = audit.as_array().unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["created", "status_changed", "status_changed"]);
}

#[tokio::test]
async fn test_backward_transition_rejected() {
    let app = TestApp::new().await;
    let (org_id, auth, _, booking_id) = setup(&app, "backward").await;

    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "CONFIRMED").await, StatusCode::OK);
    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "TENTATIVE").await, StatusCode::CONFLICT);
    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "CONFIRMED").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_status_rejected() {
    let app = TestApp::new().await;
    let (org_id, auth, _, booking_id) = setup(&app, "badstatus").await;

    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "PARKED").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_terminal_booking_is_locked() {
    let app = TestApp::new().await;
    let (org_id, auth, _, booking_id) = setup(&app, "terminal").await;

    let (status, cancelled) = app.request(
        "DELETE",
        &format!("/api/v1/{}/bookings/{}", org_id, booking_id),
        &auth,
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], json!("CANCELLED"));

    // No transition, edit or cancel touches a terminal booking.
    assert_eq!(set_status(&app, &org_id, &auth, &booking_id, "CONFIRMED").await, StatusCode::CONFLICT);

    let (status, _) = app.request(
        "PUT",
        &format!("/api/v1/{}/bookings/{}", org_id, booking_id),
        &auth,
        Some(json!({"customer_name": "Someone Else"})),
    ).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.request(
        "DELETE",
        &format!("/api/v1/{}/bookings/{}", org_id, booking_id),
        &auth,
        None,
    ).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancellation_frees_the_vehicle() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id, booking_id) = setup(&app, "frees").await;

    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/vehicles", org_id, booking_id),
        &auth,
        Some(json!({"vehicle_id": vehicle_id})),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let availability_payload = json!({
        "start_at": apr2(9, 0),
        "end_at": apr2(11, 0),
        "vehicle_ids": [vehicle_id]
    });

    let (_, body) = app.request("POST", &format!("/api/v1/{}/availability", org_id), &auth, Some(availability_payload.clone())).await;
    assert_eq!(body["results"][0]["is_available"], json!(false));

    app.request("DELETE", &format!("/api/v1/{}/bookings/{}", org_id, booking_id), &auth, None).await;

    let (_, body) = app.request("POST", &format!("/api/v1/{}/availability", org_id), &auth, Some(availability_payload)).await;
    assert_eq!(body["results"][0]["is_available"], json!(true));

    // The freed interval is bookable again.
    let (status, rebooked) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings", org_id),
        &auth,
        Some(json!({
            "customer_name": "Meera",
            "start_at": apr2(8, 0),
            "end_at": apr2(18, 0)
        })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/vehicles", org_id, rebooked["id"].as_str().unwrap()),
        &auth,
        Some(json!({"vehicle_id": vehicle_id})),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_date_change_rechecks_overlap() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id, booking_id) = setup(&app, "datemove").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/vehicles", org_id, booking_id),
        &auth,
        Some(json!({"vehicle_id": vehicle_id})),
    ).await;

    // A second booking holds the vehicle on the next day.
    let (_, other) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings", org_id),
        &auth,
        Some(json!({
            "customer_name": "Dev",
            "start_at": Utc.with_ymd_and_hms(2027, 4, 3, 8, 0, 0).unwrap(),
            "end_at": Utc.with_ymd_and_hms(2027, 4, 3, 18, 0, 0).unwrap()
        })),
    ).await;
    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/vehicles", org_id, other["id"].as_str().unwrap()),
        &auth,
        Some(json!({"vehicle_id": vehicle_id})),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    // Moving the first booking onto the second one's day must collide.
    let (status, body) = app.request(
        "PUT",
        &format!("/api/v1/{}/bookings/{}", org_id, booking_id),
        &auth,
        Some(json!({
            "start_at": Utc.with_ymd_and_hms(2027, 4, 3, 9, 0, 0).unwrap(),
            "end_at": Utc.with_ymd_and_hms(2027, 4, 3, 12, 0, 0).unwrap()
        })),
    ).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["conflict"]["booking_reference"].as_str().unwrap().starts_with("BK-"));

    // Moving it within free space succeeds and leaves an audit entry.
    let (status, _) = app.request(
        "PUT",
        &format!("/api/v1/{}/bookings/{}", org_id, booking_id),
        &auth,
        Some(json!({
            "start_at": apr2(9, 0),
            "end_at": apr2(17, 0)
        })),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let (_, audit) = app.request(
        "GET",
        &format!("/api/v1/{}/bookings/{}/audit", org_id, booking_id),
        &auth,
        None,
    ).await;
    let actions: Vec<&str> = audit.as_array().unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"date_changed"));
}
