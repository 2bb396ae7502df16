use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorAuth;
use crate::api::dtos::requests::CreateResourceRequest;
use crate::domain::models::resource::{NewResourceParams, Resource};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_options(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let resources = state.resource_repo.list().await?;
    Ok(Json(resources))
}

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    _operator: OperatorAuth,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.price <= 0 {
        return Err(AppError::Validation("Price must be positive".into()));
    }
    if payload.max_guests < 1 {
        return Err(AppError::Validation("Guest capacity must be at least 1".into()));
    }

    let resource = Resource::new(NewResourceParams {
        kind: payload.kind,
        name: payload.name,
        price: payload.price,
        max_guests: payload.max_guests,
        price_per_plate: payload.price_per_plate,
    });

    let created = state.resource_repo.create(&resource).await?;
    info!("Resource created: {} ({})", created.name, created.id);
    Ok(Json(created))
}
