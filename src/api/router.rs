use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{blocked_date, booking, catalog, health, reservation};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalog
        .route("/api/v1/options", get(catalog::list_options).post(catalog::create_resource))

        // Blocked calendar
        .route("/api/v1/blocked-dates", get(blocked_date::list_blocked_dates).post(blocked_date::create_blocked_date))
        .route("/api/v1/blocked-dates/{id}", delete(blocked_date::delete_blocked_date))

        // Public reservation flow
        .route("/api/v1/reservations", post(reservation::create_reservation))
        .route("/api/v1/reservations/{id}", get(reservation::get_reservation).patch(reservation::update_reservation))
        .route("/api/v1/reservations/{id}/otp/send", post(reservation::send_otp))
        .route("/api/v1/reservations/{id}/otp/verify", post(reservation::verify_otp))
        .route("/api/v1/reservations/{id}/payment/order", post(reservation::create_payment_order))
        .route("/api/v1/reservations/{id}/payment/callback", post(reservation::payment_callback))

        // Operator flow
        .route("/api/v1/operator/reservations", post(reservation::create_operator_reservation))
        .route("/api/v1/reservations/{id}/commit-offline", post(reservation::commit_offline))

        // Back office
        .route("/api/v1/bookings", get(booking::list_bookings))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))

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
        .with_state(state)
}
