use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::dto::{Login, LoginResponse, SignUp},
    error::{ApiError, ServiceError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUp>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "signup body rejected");
        ApiError::bad_request("invalid request")
    })?;

    match state.services.auth.sign_up(request).await {
        Ok(_) => Ok(StatusCode::CREATED),
        Err(ServiceError::AlreadyExists) => {
            Err(ApiError::new(StatusCode::CONFLICT, "user exists"))
        }
        Err(_) => Err(ApiError::bad_request("invalid request")),
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "login body rejected");
        ApiError::bad_request("Bad request")
    })?;

    match state.services.auth.login(request).await {
        Ok(response) => Ok(Json(response)),
        Err(ServiceError::NotFound) => Err(ApiError::new(StatusCode::NOT_FOUND, "Not found")),
        Err(ServiceError::InvalidInput(_)) => Err(ApiError::bad_request("incorrect credentials!")),
        Err(_) => Err(ApiError::bad_request("Bad credentials")),
    }
}
