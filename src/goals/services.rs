use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::db::DbError;
use crate::error::ServiceError;
use crate::goals::{
    dto::{CreateGoal, UpdateGoal},
    repo::GoalRepository,
    repo_types::Goal,
};
use crate::validation::ListParams;

#[derive(Clone)]
pub struct GoalService {
    goals: Arc<dyn GoalRepository>,
}

impl GoalService {
    pub fn new(goals: Arc<dyn GoalRepository>) -> Self {
        Self { goals }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, user_id: i64, input: CreateGoal) -> Result<Goal, ServiceError> {
        let new_goal = input.into_new_goal().map_err(|e| {
            warn!(error = %e, "invalid goal");
            ServiceError::from(e)
        })?;

        let id = self.goals.create(user_id, &new_goal).await.map_err(|e| {
            error!(error = %e, "create goal failed");
            ServiceError::from_write(e)
        })?;

        let goal = self.goals.get_by_id(id).await.map_err(|e| {
            error!(error = %e, goal_id = id, "fetch created goal failed");
            ServiceError::from_lookup(e)
        })?;

        info!(goal_id = id, "goal created");
        Ok(goal)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: i64, params: ListParams) -> Result<Vec<Goal>, ServiceError> {
        params.validate().map_err(|e| {
            warn!(error = %e, "invalid pagination");
            ServiceError::from(e)
        })?;

        self.goals.list(user_id, &params).await.map_err(|e| {
            error!(error = %e, "list goals failed");
            ServiceError::ServiceUnavailable
        })
    }

    /// Fetches a goal and checks that `user_id` owns it.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, user_id: i64, id: i64) -> Result<Goal, ServiceError> {
        let goal = self.goals.get_by_id(id).await.map_err(|e| {
            warn!(error = %e, "goal lookup failed");
            ServiceError::from_lookup(e)
        })?;

        if goal.user_id != user_id {
            warn!(owner_id = goal.user_id, "goal belongs to another user");
            return Err(ServiceError::PermissionDenied);
        }
        Ok(goal)
    }

    #[instrument(skip(self, input))]
    pub async fn update_by_id(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateGoal,
    ) -> Result<(), ServiceError> {
        let changes = input.into_changes().map_err(|e| {
            warn!(error = %e, "invalid goal update");
            ServiceError::from(e)
        })?;

        self.get_by_id(user_id, id).await?;

        self.goals
            .update_by_id(id, &changes)
            .await
            .map_err(|e| mutation_error("update", e))?;
        info!(goal_id = id, "goal updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, user_id: i64, id: i64) -> Result<(), ServiceError> {
        self.get_by_id(user_id, id).await?;

        self.goals
            .delete_by_id(id)
            .await
            .map_err(|e| mutation_error("delete", e))?;
        info!(goal_id = id, "goal deleted");
        Ok(())
    }
}

fn mutation_error(op: &'static str, err: DbError) -> ServiceError {
    match err {
        DbError::NotFound => {
            warn!(op, "goal vanished before mutation");
            ServiceError::NotFound
        }
        other => {
            error!(op, error = %other, "goal mutation failed");
            ServiceError::from_write(other)
        }
    }
}
