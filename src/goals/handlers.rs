use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    goals::{
        dto::{CreateGoal, UpdateGoal},
        repo_types::Goal,
    },
    state::AppState,
    validation::ListParams,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/:id",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
}

/// Path ids must be positive; anything unparsable reports as 0.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let id = raw.parse::<i64>().unwrap_or(0);
    if id <= 0 {
        return Err(ApiError::bad_request(format!("incorrect id: {id}")));
    }
    Ok(id)
}

pub fn bad_body(e: JsonRejection) -> ApiError {
    warn!(error = %e, "body rejected");
    ApiError::bad_request("Bad request")
}

pub fn bad_query(e: QueryRejection) -> ApiError {
    warn!(error = %e, "query rejected");
    ApiError::bad_request("Bad request")
}

#[instrument(skip(state, payload), fields(user_id = user.0.user_id))]
pub async fn create_goal(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateGoal>, JsonRejection>,
) -> Result<(StatusCode, Json<Goal>), ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    let goal = state.services.goals.create(user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

#[instrument(skip(state, params), fields(user_id = user.0.user_id))]
pub async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let goals = state.services.goals.list(user.0.user_id, params).await?;
    Ok(Json(goals))
}

#[instrument(skip(state), fields(user_id = user.0.user_id))]
pub async fn get_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Goal>, ApiError> {
    let id = parse_id(&id)?;
    let goal = state.services.goals.get_by_id(user.0.user_id, id).await?;
    Ok(Json(goal))
}

#[instrument(skip(state, payload), fields(user_id = user.0.user_id))]
pub async fn update_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGoal>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload.map_err(bad_body)?;
    state
        .services
        .goals
        .update_by_id(user.0.user_id, id, input)
        .await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state), fields(user_id = user.0.user_id))]
pub async fn delete_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.services.goals.delete_by_id(user.0.user_id, id).await?;
    Ok(StatusCode::OK)
}
