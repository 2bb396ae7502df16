mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp, ACCEPTED_OTP};
use serde_json::json;
use std::sync::atomic::Ordering;

async fn open_session(app: &TestApp, resource_id: &str) -> String {
    let res = app.post_json("/api/v1/reservations", json!({"resource_id": resource_id})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["state"], "DRAFT");
    body["reservation_id"].as_str().unwrap().to_string()
}

async fn fill_draft(app: &TestApp, id: &str) {
    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({
            "check_in": "2024-06-01", "check_out": "2024-06-03",
            "adults": 2, "children": 1,
            "email": "guest@example.com", "phone": "9876543210"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

async fn verify(app: &TestApp, id: &str) {
    let res = app.post_json(&format!("/api/v1/reservations/{}/otp/send", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/otp/verify", id),
        json!({"otp": ACCEPTED_OTP}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["success"], true);
}

#[tokio::test]
async fn test_full_public_flow_commits_a_booking() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;

    let id = open_session(&app, &room_id).await;

    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({"check_in": "2024-06-01", "check_out": "2024-06-03"}),
    ).await;
    let body = parse_body(res).await;
    assert_eq!(body["quote"]["nights"], 2);
    assert_eq!(body["quote"]["total_amount"], 4000);

    fill_draft(&app, &id).await;
    verify(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["order"]["id"], "order_test_1");
    assert_eq!(body["order"]["amount"], 4000);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/payment/callback", id),
        json!({"razorpay_payment_id": "pay_123"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking = parse_body(res).await;
    assert_eq!(booking["status"], "CONFIRMED");
    assert_eq!(booking["amount"], 4000);
    assert_eq!(booking["nights"], 2);
    assert_eq!(booking["payment_id"], "pay_123");
    assert_eq!(booking["customer_phone"], "9876543210");

    // Invoice went out to the guest.
    let sent = app.emails.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "guest@example.com");

    // The session is gone once committed.
    let res = app.get(&format!("/api/v1/reservations/{}", id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // And the booking is durably listed for the back office.
    let res = app.operator_get("/api/v1/bookings").await;
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["payment_id"], "pay_123");
}

#[tokio::test]
async fn test_payment_order_is_unreachable_before_verification() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;
    fill_draft(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(app.payments.orders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_otp_is_rejected_then_retryable() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;
    fill_draft(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/otp/send", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/otp/verify", id),
        json!({"otp": "000000"}),
    ).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/otp/verify", id),
        json!({"otp": ACCEPTED_OTP}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_otp_send_requires_contact_fields() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/otp/send", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(app.otp.sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_phone_is_normalized_on_edit() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;

    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({"phone": "98-765 43210x9"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["draft"]["phone"], "9876543210");
}

#[tokio::test]
async fn test_guest_count_over_capacity_is_rejected() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;

    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({"adults": 2, "children": 1}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    // max_guests is 5 for the seeded room.
    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({"adults": 4, "children": 2}),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get(&format!("/api/v1/reservations/{}", id)).await;
    let body = parse_body(res).await;
    assert_eq!(body["draft"]["adults"], 2);
    assert_eq!(body["draft"]["children"], 1);
}

#[tokio::test]
async fn test_cancelled_checkout_returns_to_verified_and_can_retry() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;
    fill_draft(&app, &id).await;
    verify(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/payment/callback", id),
        json!({"cancelled": true}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["state"], "VERIFIED");

    // A fresh attempt creates a fresh order.
    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["order"]["id"], "order_test_2");
}

#[tokio::test]
async fn test_gateway_failure_is_surfaced_and_rewinds() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;
    fill_draft(&app, &id).await;
    verify(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/payment/callback", id),
        json!({"error": "card declined"}),
    ).await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);

    let res = app.get(&format!("/api/v1/reservations/{}", id)).await;
    assert_eq!(parse_body(res).await["state"], "VERIFIED");
}

#[tokio::test]
async fn test_contact_change_after_verification_forces_reverification() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;
    fill_draft(&app, &id).await;
    verify(&app, &id).await;

    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({"phone": "9123456789"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["state"], "DRAFT");

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_inverted_stay_range_cannot_reach_payment() {
    let app = TestApp::new().await;
    let room_id = app.seed_room().await;
    let id = open_session(&app, &room_id).await;

    let res = app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({
            "check_in": "2024-06-10", "check_out": "2024-06-03",
            "email": "guest@example.com", "phone": "9876543210"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    // Live quote still shows the floored single night.
    assert_eq!(parse_body(res).await["quote"]["nights"], 1);

    verify(&app, &id).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.payments.orders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = TestApp::new().await;
    let res = app.get("/api/v1/reservations/nope").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
