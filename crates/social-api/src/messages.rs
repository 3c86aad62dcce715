use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::debug;

use social_types::api::{PostMessageRequest, UpdateMessageRequest};
use social_types::models::Message;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::services::{AccountService, MessageError, MessageService};
use crate::{AppState, blocking};

/// Missing rows are a normal outcome on the by-id routes: 200 with no body.
fn json_or_empty<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// POST /messages — `posted_by` must name an existing account.
pub async fn post_message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PostMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = blocking(&state, move |db| {
        if AccountService::new(db).find(req.posted_by)?.is_none() {
            return Err(MessageError::UnknownAuthor(req.posted_by));
        }
        MessageService::new(db).post(&req)
    })
    .await?
    .map_err(|e| ApiError::rejected(StatusCode::BAD_REQUEST, e))?;

    debug!("Message {} posted by {}", message.message_id, message.posted_by);
    Ok(Json(message))
}

pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = blocking(&state, |db| MessageService::new(db).list_all()).await??;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    WithRejection(Path(message_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Response, ApiError> {
    let message = blocking(&state, move |db| MessageService::new(db).get(message_id)).await??;
    Ok(json_or_empty(message))
}

/// DELETE /messages/{message_id} — idempotent; repeat calls get an empty 200.
pub async fn delete_message(
    State(state): State<AppState>,
    WithRejection(Path(message_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Response, ApiError> {
    let deleted = blocking(&state, move |db| MessageService::new(db).delete(message_id)).await??;

    if deleted.is_some() {
        debug!("Message {} deleted", message_id);
    }
    Ok(json_or_empty(deleted))
}

/// PATCH /messages/{message_id} — only `message_text` is read from the body.
pub async fn update_message(
    State(state): State<AppState>,
    WithRejection(Path(message_id), _): WithRejection<Path<i64>, ApiError>,
    JsonBody(req): JsonBody<UpdateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = blocking(&state, move |db| {
        MessageService::new(db).update(message_id, &req.message_text)
    })
    .await?
    .map_err(|e| ApiError::rejected(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(message))
}

pub async fn list_account_messages(
    State(state): State<AppState>,
    WithRejection(Path(account_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages =
        blocking(&state, move |db| MessageService::new(db).list_by_account(account_id)).await??;
    Ok(Json(messages))
}
