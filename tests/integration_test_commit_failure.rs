mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp, ACCEPTED_OTP};
use serde_json::json;
use std::sync::atomic::Ordering;

/// Payment is captured but the booking insert fails: the guest must be
/// told to contact support, and nothing may quietly retry or re-charge.
#[tokio::test]
async fn test_commit_failure_after_capture_escalates_to_support() {
    let app = TestApp::with_failing_bookings().await;
    let room_id = app.seed_room().await;

    let res = app.post_json("/api/v1/reservations", json!({"resource_id": room_id})).await;
    let id = parse_body(res).await["reservation_id"].as_str().unwrap().to_string();

    app.patch_json(
        &format!("/api/v1/reservations/{}", id),
        json!({
            "check_in": "2024-06-01", "check_out": "2024-06-03",
            "email": "guest@example.com", "phone": "9876543210"
        }),
    ).await;
    app.post_json(&format!("/api/v1/reservations/{}/otp/send", id), json!({})).await;
    app.post_json(&format!("/api/v1/reservations/{}/otp/verify", id), json!({"otp": ACCEPTED_OTP})).await;

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_json(
        &format!("/api/v1/reservations/{}/payment/callback", id),
        json!({"razorpay_payment_id": "pay_123"}),
    ).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("contact support"));
    assert_eq!(body["payment_id"], "pay_123");

    // No invoice for an unconfirmed booking.
    assert!(app.emails.sent.lock().unwrap().is_empty());

    // The session is parked terminally; a second callback cannot restart
    // the attempt and no second order is ever created.
    let res = app.post_json(
        &format!("/api/v1/reservations/{}/payment/callback", id),
        json!({"razorpay_payment_id": "pay_456"}),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.post_json(&format!("/api/v1/reservations/{}/payment/order", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(app.payments.orders.load(Ordering::SeqCst), 1);
}
