use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    goals::handlers::{bad_body, bad_query, parse_id},
    state::AppState,
    tasks::{
        dto::{CreateTask, UpdateTask},
        repo_types::Task,
    },
    validation::ListParams,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/goals/:id/tasks", get(list_tasks).post(create_task))
        .route(
            "/goals/:id/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

fn parse_ids((goal_id, task_id): (String, String)) -> Result<(i64, i64), ApiError> {
    Ok((parse_id(&goal_id)?, parse_id(&task_id)?))
}

#[instrument(skip(state, payload), fields(user_id = user.0.user_id))]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<String>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let goal_id = parse_id(&goal_id)?;
    let Json(input) = payload.map_err(bad_body)?;
    let task = state
        .services
        .tasks
        .create(user.0.user_id, goal_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, params), fields(user_id = user.0.user_id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let goal_id = parse_id(&goal_id)?;
    let Query(params) = params.map_err(bad_query)?;
    let tasks = state
        .services
        .tasks
        .list(user.0.user_id, goal_id, params)
        .await?;
    Ok(Json(tasks))
}

#[instrument(skip(state), fields(user_id = user.0.user_id))]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
) -> Result<Json<Task>, ApiError> {
    let (goal_id, task_id) = parse_ids(ids)?;
    let task = state
        .services
        .tasks
        .get_by_id(user.0.user_id, goal_id, task_id)
        .await?;
    Ok(Json(task))
}

#[instrument(skip(state, payload), fields(user_id = user.0.user_id))]
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let (goal_id, task_id) = parse_ids(ids)?;
    let Json(input) = payload.map_err(bad_body)?;
    state
        .services
        .tasks
        .update_by_id(user.0.user_id, goal_id, task_id, input)
        .await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state), fields(user_id = user.0.user_id))]
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (goal_id, task_id) = parse_ids(ids)?;
    state
        .services
        .tasks
        .delete_by_id(user.0.user_id, goal_id, task_id)
        .await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        app::build_app,
        testing::{bearer_for, test_state},
    };

    async fn call(
        state: &AppState,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = build_app(state.clone())
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn create_goal(state: &AppState, token: &str) -> i64 {
        let (status, goal) = call(
            state,
            "POST",
            "/api/v1/goals",
            token,
            Some(json!({ "name": "Learn piano", "description": "Chopin by winter" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        goal["id"].as_i64().expect("goal id")
    }

    #[tokio::test]
    async fn task_lifecycle_under_a_goal() {
        let state = test_state();
        let token = bearer_for(&state, "ada").await;
        let goal_id = create_goal(&state, &token).await;

        let (status, created) = call(
            &state,
            "POST",
            &format!("/api/v1/goals/{goal_id}/tasks"),
            &token,
            Some(json!({ "name": "Scales", "description": "C major", "frequency": "Daily" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["frequency"], "Daily");
        assert_eq!(created["status"], false);
        assert_eq!(created["goal_id"], goal_id);
        let task_uri = format!("/api/v1/goals/{goal_id}/tasks/{}", created["id"]);

        let (status, _) = call(&state, "PUT", &task_uri, &token, Some(json!({ "status": true }))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, fetched) = call(&state, "GET", &task_uri, &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["status"], true);

        let (status, listed) = call(
            &state,
            "GET",
            &format!("/api/v1/goals/{goal_id}/tasks?page_id=1&page_size=5"),
            &token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));

        let (status, _) = call(&state, "DELETE", &task_uri, &token, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&state, "GET", &task_uri, &token, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_users_task_is_forbidden() {
        let state = test_state();
        let alice = bearer_for(&state, "alice").await;
        let bob = bearer_for(&state, "bob").await;
        let goal_id = create_goal(&state, &alice).await;

        let (_, created) = call(
            &state,
            "POST",
            &format!("/api/v1/goals/{goal_id}/tasks"),
            &alice,
            Some(json!({ "name": "Secret", "description": "mine", "frequency": "Monthly" })),
        )
        .await;

        let (status, body) = call(
            &state,
            "GET",
            &format!("/api/v1/goals/{goal_id}/tasks/{}", created["id"]),
            &bob,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Access forbidden");
    }

    #[tokio::test]
    async fn invalid_task_input_is_rejected() {
        let state = test_state();
        let token = bearer_for(&state, "ada").await;
        let goal_id = create_goal(&state, &token).await;

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/v1/goals/{goal_id}/tasks"),
            &token,
            Some(json!({ "name": "Scales", "description": "C major", "frequency": "daily" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "incorrect frequency: \"daily\"");

        let (status, body) = call(
            &state,
            "GET",
            &format!("/api/v1/goals/{goal_id}/tasks/nope"),
            &token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "incorrect id: 0");
    }
}
