mod common;

use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::json;

fn mar10(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2027, 3, 10, h, m, 0).unwrap()
}

async fn setup_fleet(app: &TestApp, slug: &str) -> (String, AuthHeaders, String) {
    let (org_id, auth) = app.setup_org(slug).await;

    let (status, vehicle) = app.request(
        "POST",
        &format!("/api/v1/{}/vehicles", org_id),
        &auth,
        Some(json!({"vehicle_number": "KA-01-1234", "make_model": "Toyota Innova"})),
    ).await;
    assert_eq!(status, StatusCode::OK);

    (org_id, auth, vehicle["id"].as_str().unwrap().to_string())
}

/// Books 10:00-14:00 on the fixed test date and assigns the vehicle.
async fn book_vehicle(app: &TestApp, org_id: &str, auth: &AuthHeaders, vehicle_id: &str) -> String {
    let (status, booking) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings", org_id),
        auth,
        Some(json!({
            "customer_name": "Asha",
            "start_at": mar10(10, 0),
            "end_at": mar10(14, 0)
        })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/{}/bookings/{}/vehicles", org_id, booking_id),
        auth,
        Some(json!({"vehicle_id": vehicle_id})),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    booking_id
}

#[tokio::test]
async fn test_gap_buffer_blocks_adjacent_range() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "gap").await;
    book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    // 14:30 start falls inside the 60-minute buffer after the 14:00 end.
    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({"start_at": mar10(14, 30), "end_at": mar10(16, 0), "vehicle_ids": [vehicle_id]})),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let entry = &body["results"][0];
    assert_eq!(entry["is_available"], json!(false));
    assert!(entry["conflict"]["booking_reference"].as_str().unwrap().starts_with("BK-"));

    // 15:01 clears the buffer.
    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({"start_at": mar10(15, 1), "end_at": mar10(16, 0), "vehicle_ids": [vehicle_id]})),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["is_available"], json!(true));
}

#[tokio::test]
async fn test_gap_minutes_override_per_request() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "gapov").await;
    book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    // A zero gap makes the back-to-back 14:00 start free.
    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({
            "start_at": mar10(14, 0), "end_at": mar10(16, 0),
            "vehicle_ids": [vehicle_id], "gap_minutes": 0
        })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["is_available"], json!(true));

    // A wider gap blocks ranges the default would allow.
    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({
            "start_at": mar10(16, 0), "end_at": mar10(17, 0),
            "vehicle_ids": [vehicle_id], "gap_minutes": 180
        })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["is_available"], json!(false));

    let (status, _) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({
            "start_at": mar10(15, 0), "end_at": mar10(16, 0),
            "vehicle_ids": [vehicle_id], "gap_minutes": -5
        })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exclude_own_booking() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "excl").await;
    let booking_id = book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    // The booking's own interval conflicts with itself unless excluded.
    let (_, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({"start_at": mar10(11, 0), "end_at": mar10(12, 0), "vehicle_ids": [vehicle_id]})),
    ).await;
    assert_eq!(body["results"][0]["is_available"], json!(false));

    let (_, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({
            "start_at": mar10(11, 0),
            "end_at": mar10(12, 0),
            "vehicle_ids": [vehicle_id],
            "exclude_booking_id": booking_id
        })),
    ).await;
    assert_eq!(body["results"][0]["is_available"], json!(true));
}

#[tokio::test]
async fn test_unknown_vehicle_gets_per_entry_error() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "unknown").await;

    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({
            "start_at": mar10(9, 0),
            "end_at": mar10(10, 0),
            "vehicle_ids": [vehicle_id, "no-such-vehicle"]
        })),
    ).await;

    // One bad id does not fail the whole request.
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["is_available"], json!(true));
    assert_eq!(results[1]["is_available"], json!(false));
    assert_eq!(results[1]["error"], json!("Vehicle not found"));
}

#[tokio::test]
async fn test_invalid_range_rejected() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "range").await;

    for (start, end) in [(mar10(16, 0), mar10(14, 0)), (mar10(14, 0), mar10(14, 0))] {
        let (status, _) = app.request(
            "POST",
            &format!("/api/v1/{}/availability", org_id),
            &auth,
            Some(json!({"start_at": start, "end_at": end, "vehicle_ids": [vehicle_id]})),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_whole_fleet_checked_when_no_ids_given() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "fleet").await;

    let (_, second) = app.request(
        "POST",
        &format!("/api/v1/{}/vehicles", org_id),
        &auth,
        Some(json!({"vehicle_number": "KA-01-5678", "make_model": "Maruti Dzire"})),
    ).await;
    let second_id = second["id"].as_str().unwrap().to_string();

    book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({"start_at": mar10(11, 0), "end_at": mar10(12, 0)})),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let busy = results.iter().find(|r| r["vehicle_id"] == json!(vehicle_id)).unwrap();
    let free = results.iter().find(|r| r["vehicle_id"] == json!(second_id)).unwrap();
    assert_eq!(busy["is_available"], json!(false));
    assert_eq!(free["is_available"], json!(true));
}

#[tokio::test]
async fn test_empty_vehicle_ids_checks_whole_fleet() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "emptyids").await;
    book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    // An explicitly empty list means the whole active fleet, same as absent.
    let (status, body) = app.request(
        "POST",
        &format!("/api/v1/{}/availability", org_id),
        &auth,
        Some(json!({"start_at": mar10(11, 0), "end_at": mar10(12, 0), "vehicle_ids": []})),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["vehicle_id"], json!(vehicle_id));
    assert_eq!(results[0]["is_available"], json!(false));
}

#[tokio::test]
async fn test_check_is_idempotent() {
    let app = TestApp::new().await;
    let (org_id, auth, vehicle_id) = setup_fleet(&app, "idem").await;
    book_vehicle(&app, &org_id, &auth, &vehicle_id).await;

    let payload = json!({"start_at": mar10(14, 30), "end_at": mar10(16, 0), "vehicle_ids": [vehicle_id]});

    let (_, first) = app.request("POST", &format!("/api/v1/{}/availability", org_id), &auth, Some(payload.clone())).await;
    let (_, second) = app.request("POST", &format!("/api/v1/{}/availability", org_id), &auth, Some(payload)).await;

    assert_eq!(first, second);
}
