use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorAuth;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list().await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}
