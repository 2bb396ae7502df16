use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use std::sync::Arc;

/// Back-office identity. A single trusted operator token from config;
/// requests carry it as a bearer header.
pub struct OperatorAuth;

impl<S> FromRequestParts<S> for OperatorAuth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get("Authorization")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let token = header.strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        if token != app_state.config.admin_token {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(OperatorAuth)
    }
}
