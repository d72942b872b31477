use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::{
    error::{AppError, ErrorResponse},
    service::accounts::{Account, AccountInput, AccountPayload},
    state::AppState,
};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Accepts `application/json` with or without parameters such as `charset`.
fn require_json(headers: &HeaderMap) -> Result<(), AppError> {
    let essence = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim);

    match essence {
        Some(media) if media.eq_ignore_ascii_case(JSON_MEDIA_TYPE) => Ok(()),
        other => {
            tracing::debug!(content_type = ?other, "invalid Content-Type");
            Err(AppError::UnsupportedMediaType {
                expected: JSON_MEDIA_TYPE,
            })
        }
    }
}

// Non-numeric ids can never name an account.
fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| AppError::NotFound)
}

fn location(account: &Account) -> String {
    format!("/accounts/{}", account.id)
}

#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body(content = AccountPayload, content_type = "application/json"),
    responses(
        (status = 201, description = "Created", body = Account,
            headers(("Location" = String, description = "URL of the new account"))),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 415, description = "Content-Type is not application/json", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("request to create an account");
    require_json(&headers)?;
    let input = AccountInput::parse(&body)?;

    let account = state.accounts().create(input).await?;
    tracing::info!(id = account.id, "account created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(&account))],
        Json(account),
    ))
}

#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Every account", body = [Account])
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AppError> {
    tracing::info!("request to list accounts");
    let accounts = state.accounts().all().await?;
    tracing::debug!(count = accounts.len(), "listed accounts");
    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "accounts",
    params(
        ("id" = i32, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 404, description = "Not found", body = String, content_type = "text/plain")
    )
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Account>, AppError> {
    tracing::info!(%id, "request to read an account");
    let id = parse_id(&id)?;

    match state.accounts().find(id).await? {
        Some(account) => Ok(Json(account)),
        None => Err(AppError::NotFound),
    }
}

#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "accounts",
    params(
        ("id" = i32, Path, description = "Account id")
    ),
    request_body(content = AccountPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Updated", body = Account),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Not found", body = String, content_type = "text/plain"),
        (status = 415, description = "Content-Type is not application/json", body = ErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Account>, AppError> {
    tracing::info!(%id, "request to update an account");
    require_json(&headers)?;
    let id = parse_id(&id)?;

    // existence is settled here, before any write is attempted
    if state.accounts().find(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let input = AccountInput::parse(&body)?;
    let account = state.accounts().update(id, input).await?;
    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "accounts",
    params(
        ("id" = i32, Path, description = "Account id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::info!(%id, "request to delete an account");
    let id = parse_id(&id)?;

    if state.accounts().find(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    state.accounts().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .with_state(state)
}
