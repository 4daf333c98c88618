use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::db::DbError;
use crate::error::ServiceError;
use crate::goals::services::GoalService;
use crate::tasks::{
    dto::{CreateTask, UpdateTask},
    repo::TaskRepository,
    repo_types::Task,
};
use crate::validation::ListParams;

/// Tasks are owned through their goal; every call re-checks task -> goal -> user.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    goals: GoalService,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, goals: GoalService) -> Self {
        Self { tasks, goals }
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        user_id: i64,
        goal_id: i64,
        input: CreateTask,
    ) -> Result<Task, ServiceError> {
        let new_task = input.into_new_task().map_err(|e| {
            warn!(error = %e, "invalid task");
            ServiceError::from(e)
        })?;

        self.goals.get_by_id(user_id, goal_id).await?;

        let id = self
            .tasks
            .create(goal_id, &new_task)
            .await
            .map_err(|e| match e {
                // goal deleted between the ownership check and the insert
                DbError::Forbidden => {
                    warn!("goal vanished before task insert");
                    ServiceError::NotFound
                }
                other => {
                    error!(error = %other, "create task failed");
                    ServiceError::from_write(other)
                }
            })?;

        let task = self.tasks.get_by_id(id).await.map_err(|e| {
            error!(error = %e, task_id = id, "fetch created task failed");
            ServiceError::from_lookup(e)
        })?;

        info!(task_id = id, "task created");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: i64,
        goal_id: i64,
        params: ListParams,
    ) -> Result<Vec<Task>, ServiceError> {
        params.validate().map_err(|e| {
            warn!(error = %e, "invalid pagination");
            ServiceError::from(e)
        })?;

        self.goals.get_by_id(user_id, goal_id).await?;

        self.tasks.list(goal_id, &params).await.map_err(|e| {
            error!(error = %e, "list tasks failed");
            ServiceError::ServiceUnavailable
        })
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        user_id: i64,
        goal_id: i64,
        task_id: i64,
    ) -> Result<Task, ServiceError> {
        let task = self.tasks.get_by_id(task_id).await.map_err(|e| {
            warn!(error = %e, "task lookup failed");
            ServiceError::from_lookup(e)
        })?;

        // A task under another goal is hidden, not forbidden.
        if task.goal_id != goal_id {
            warn!(actual_goal_id = task.goal_id, "task requested under wrong goal");
            return Err(ServiceError::NotFound);
        }

        self.goals.get_by_id(user_id, goal_id).await?;
        Ok(task)
    }

    #[instrument(skip(self, input))]
    pub async fn update_by_id(
        &self,
        user_id: i64,
        goal_id: i64,
        task_id: i64,
        input: UpdateTask,
    ) -> Result<(), ServiceError> {
        let changes = input.into_changes().map_err(|e| {
            warn!(error = %e, "invalid task update");
            ServiceError::from(e)
        })?;

        self.get_by_id(user_id, goal_id, task_id).await?;

        self.tasks
            .update_by_id(task_id, &changes)
            .await
            .map_err(|e| mutation_error("update", e))?;
        info!(task_id, "task updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(
        &self,
        user_id: i64,
        goal_id: i64,
        task_id: i64,
    ) -> Result<(), ServiceError> {
        self.get_by_id(user_id, goal_id, task_id).await?;

        self.tasks
            .delete_by_id(task_id)
            .await
            .map_err(|e| mutation_error("delete", e))?;
        info!(task_id, "task deleted");
        Ok(())
    }
}

fn mutation_error(op: &'static str, err: DbError) -> ServiceError {
    match err {
        DbError::NotFound => {
            warn!(op, "task vanished before mutation");
            ServiceError::NotFound
        }
        other => {
            error!(op, error = %other, "task mutation failed");
            ServiceError::from_write(other)
        }
    }
}
