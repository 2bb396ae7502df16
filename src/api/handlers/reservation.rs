use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorAuth;
use crate::api::dtos::requests::{
    CreateReservationRequest, PaymentCallbackRequest, UpdateReservationRequest, VerifyOtpRequest,
};
use crate::api::dtos::responses::{
    OrderSummary, PaymentOrderResponse, ReservationCreatedResponse, ReservationResponse,
};
use crate::domain::models::blocked_date::BlockedDateSet;
use crate::domain::services::reservation::{CommitDeps, ReservationFlow};
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

async fn open_session(
    state: &AppState,
    resource_id: &str,
    requires_verification: bool,
) -> Result<ReservationCreatedResponse, AppError> {
    let resource = state.resource_repo.find_by_id(resource_id).await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    let rows = state.blocked_date_repo.list(Some(resource.kind)).await?;
    let blocked = BlockedDateSet::from_rows(&rows, resource.kind);
    let blocked_dates = blocked.dates();

    let flow = ReservationFlow::new(resource, blocked, requires_verification);
    let flow_state = flow.state;
    let reservation_id = state.sessions.insert(flow);
    info!("Reservation session {} opened for resource {}", reservation_id, resource_id);

    Ok(ReservationCreatedResponse {
        reservation_id,
        state: flow_state,
        blocked_dates,
    })
}

fn load_session(state: &AppState, id: &str) -> Result<Arc<Mutex<ReservationFlow>>, AppError> {
    state.sessions.get(id)
        .ok_or(AppError::NotFound("Reservation session not found".into()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))
}

fn commit_deps(state: &AppState) -> CommitDeps<'_> {
    CommitDeps {
        blocked_dates: state.blocked_date_repo.as_ref(),
        bookings: state.booking_repo.as_ref(),
        email: state.email_service.as_ref(),
        templates: state.templates.as_ref(),
    }
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = open_session(&state, &payload.resource_id, true).await?;
    Ok(Json(response))
}

pub async fn create_operator_reservation(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = open_session(&state, &payload.resource_id, false).await?;
    Ok(Json(response))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let flow = session.lock().await;
    Ok(Json(ReservationResponse::from_flow(&flow)))
}

pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    if let Some(plates) = payload.plate_order {
        flow.edit_plate_order(plates)?;
    }
    if payload.adults.is_some() || payload.children.is_some() {
        let adults = payload.adults.unwrap_or(flow.draft.adults);
        let children = payload.children.unwrap_or(flow.draft.children);
        flow.edit_occupancy(adults, children)?;
    }
    if let Some(raw) = payload.check_in.as_deref() {
        flow.edit_check_in(parse_date(raw)?)?;
    }
    if let Some(raw) = payload.check_out.as_deref() {
        flow.edit_check_out(parse_date(raw)?)?;
    }
    if let Some(email) = payload.email {
        flow.edit_email(email)?;
    }
    if let Some(raw) = payload.phone.as_deref() {
        flow.edit_phone(raw)?;
    }

    Ok(Json(ReservationResponse::from_flow(&flow)))
}

pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    flow.request_code(state.otp_gateway.as_ref()).await?;
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({"status": "sent"}))))
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    flow.submit_code(state.otp_gateway.as_ref(), &payload.otp).await?;
    Ok(Json(serde_json::json!({"success": true})))
}

pub async fn create_payment_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    let order = flow
        .begin_payment(
            state.blocked_date_repo.as_ref(),
            state.payment_gateway.as_ref(),
            &state.config.currency,
        )
        .await?;

    Ok(Json(PaymentOrderResponse {
        order: OrderSummary { id: order.id, amount: order.amount },
    }))
}

pub async fn payment_callback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentCallbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    if let Some(payment_id) = payload.razorpay_payment_id {
        let booking = flow.complete_payment(&commit_deps(&state), payment_id).await?;
        // The attempt is finished; the draft dies with the session.
        state.sessions.remove(&id);
        return Ok(Json(booking).into_response());
    }

    if payload.cancelled {
        flow.payment_cancelled()?;
        return Ok(Json(ReservationResponse::from_flow(&flow)).into_response());
    }

    if let Some(reason) = payload.error {
        flow.payment_failed(&reason)?;
        return Err(AppError::PaymentGateway(reason));
    }

    Err(AppError::Validation(
        "Callback must carry a payment id, an error, or a cancellation".into(),
    ))
}

pub async fn commit_offline(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_session(&state, &id)?;
    let mut flow = session.lock().await;
    flow.touch();

    let booking = flow.commit_offline(&commit_deps(&state)).await?;
    state.sessions.remove(&id);
    Ok(Json(booking))
}
