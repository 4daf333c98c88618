use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::db::{parse_error, DbError};
use crate::tasks::repo_types::{NewTask, Task, TaskChanges};
use crate::validation::ListParams;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// A missing goal surfaces as `DbError::Forbidden` (foreign key).
    async fn create(&self, goal_id: i64, task: &NewTask) -> Result<i64, DbError>;

    async fn list(&self, goal_id: i64, params: &ListParams) -> Result<Vec<Task>, DbError>;

    async fn get_by_id(&self, id: i64) -> Result<Task, DbError>;

    async fn update_by_id(&self, id: i64, changes: &TaskChanges) -> Result<(), DbError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct PgTaskRepository {
    db: PgPool,
}

impl PgTaskRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn build_task_update(id: i64, changes: &TaskChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE tasks SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(name) = &changes.name {
            set.push("name = ");
            set.push_bind_unseparated(name.clone());
        }
        if let Some(description) = &changes.description {
            set.push("description = ");
            set.push_bind_unseparated(description.clone());
        }
        if let Some(frequency) = changes.frequency {
            set.push("frequency = ");
            set.push_bind_unseparated(frequency);
        }
        if let Some(status) = changes.status {
            set.push("status = ");
            set.push_bind_unseparated(status);
        }
        set.push("updated_at = now()");
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, goal_id: i64, task: &NewTask) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tasks (name, description, frequency, goal_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.frequency)
        .bind(goal_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, goal_id, "insert task failed");
            parse_error(e)
        })
    }

    async fn list(&self, goal_id: i64, params: &ListParams) -> Result<Vec<Task>, DbError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, frequency, status, goal_id, created_at, updated_at
            FROM tasks
            WHERE goal_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(goal_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, goal_id, "list tasks failed");
            parse_error(e)
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Task, DbError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, frequency, status, goal_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, task_id = id, "get task failed");
            parse_error(e)
        })
    }

    async fn update_by_id(&self, id: i64, changes: &TaskChanges) -> Result<(), DbError> {
        let result = build_task_update(id, changes)
            .build()
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, task_id = id, "update task failed");
                parse_error(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, task_id = id, "delete task failed");
                parse_error(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::repo_types::Frequency;

    #[test]
    fn status_only_update() {
        let changes = TaskChanges {
            status: Some(true),
            ..Default::default()
        };
        assert_eq!(
            build_task_update(3, &changes).sql(),
            "UPDATE tasks SET status = $1, updated_at = now() WHERE id = $2"
        );
    }

    #[test]
    fn placeholders_follow_field_order() {
        let changes = TaskChanges {
            name: Some("n".into()),
            frequency: Some(Frequency::Weekly),
            status: Some(false),
            ..Default::default()
        };
        assert_eq!(
            build_task_update(3, &changes).sql(),
            "UPDATE tasks SET name = $1, frequency = $2, status = $3, updated_at = now() WHERE id = $4"
        );
    }
}
