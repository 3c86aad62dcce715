use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use social_types::api::{LoginRequest, RegisterRequest};
use social_types::models::Account;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::services::AccountService;
use crate::{AppState, blocking};

/// POST /register — 200 with the new account, 400 on any rejection.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<Account>, ApiError> {
    let account = blocking(&state, move |db| AccountService::new(db).register(&req))
        .await?
        .map_err(|e| ApiError::rejected(StatusCode::BAD_REQUEST, e))?;

    info!("Registered account {} ({})", account.account_id, account.username);
    Ok(Json(account))
}

/// POST /login — 200 with the matching account, 401 otherwise.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<Account>, ApiError> {
    let account = blocking(&state, move |db| AccountService::new(db).authenticate(&req))
        .await?
        .map_err(|e| ApiError::rejected(StatusCode::UNAUTHORIZED, e))?;

    Ok(Json(account))
}
