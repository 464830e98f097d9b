//! Record handlers: list pets, list messages, coordinated write.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{WriteParams, WriteRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /pets` — List pet nicknames from datastore `a`.
///
/// # Errors
///
/// Returns [`GatewayError`] on database failure.
#[utoipa::path(
    get,
    path = "/pets",
    tag = "Records",
    summary = "List pets",
    description = "Returns the nickname of every committed pet in datastore a, in insertion order.",
    responses(
        (status = 200, description = "Pet nicknames", body = Vec<String>),
        (status = 500, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn list_pets(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let nicknames = state.pet_service.list_pets().await?;
    Ok(Json(nicknames))
}

/// `GET /messages` — List message texts from datastore `b`.
///
/// # Errors
///
/// Returns [`GatewayError`] on database failure.
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Records",
    summary = "List messages",
    description = "Returns the text of every committed message in datastore b, in insertion order.",
    responses(
        (status = 200, description = "Message texts", body = Vec<String>),
        (status = 500, description = "Datastore failure", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let texts = state.pet_service.list_messages().await?;
    Ok(Json(texts))
}

/// `POST /` — Insert a pet and its greeting in one global transaction.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a missing `name` or a
/// malformed body or query, and a server error when the transaction is
/// rolled back.
#[utoipa::path(
    post,
    path = "/",
    tag = "Records",
    summary = "Coordinated write",
    description = "Inserts a pet named `name` into datastore a and the message `Hello, <name>` into datastore b atomically. With `rollback=true` both inserts are staged and then rolled back.",
    params(WriteParams),
    request_body = WriteRequest,
    responses(
        (status = 200, description = "Both inserts committed"),
        (status = 400, description = "Missing name or malformed request", body = ErrorResponse),
        (status = 500, description = "Transaction rolled back", body = ErrorResponse),
    )
)]
pub async fn write(
    State(state): State<AppState>,
    params: Result<Query<WriteParams>, QueryRejection>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> Result<StatusCode, GatewayError> {
    let Query(params) = params?;
    let Json(req) = payload?;
    let name = req.name()?;

    state
        .pet_service
        .write(name, params.rollback.unwrap_or(false))
        .await?;

    Ok(StatusCode::OK)
}

/// Record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(write))
        .route("/pets", get(list_pets))
        .route("/messages", get(list_messages))
}
