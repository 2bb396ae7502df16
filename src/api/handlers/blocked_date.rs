use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorAuth;
use crate::api::dtos::requests::CreateBlockedDateRequest;
use crate::domain::models::blocked_date::BlockedDate;
use crate::domain::models::resource::ResourceKind;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub async fn list_blocked_dates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let kind = match params.get("type") {
        Some(raw) => Some(
            ResourceKind::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown resource type: {}", raw)))?,
        ),
        None => None,
    };

    let blocked = state.blocked_date_repo.list(kind).await?;
    Ok(Json(blocked))
}

pub async fn create_blocked_date(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Json(payload): Json<CreateBlockedDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entity = BlockedDate::new(payload.date, payload.kind, payload.reason);
    let saved = state.blocked_date_repo.create(&entity).await?;
    info!("Blocked {} for {:?} bookings", saved.date, saved.kind);
    Ok(Json(saved))
}

pub async fn delete_blocked_date(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.blocked_date_repo.delete(&id).await?;
    info!("Blocked date removed: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
