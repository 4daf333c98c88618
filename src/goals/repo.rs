use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::db::{parse_error, DbError};
use crate::goals::repo_types::{Goal, GoalChanges, NewGoal};
use crate::validation::ListParams;

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, user_id: i64, goal: &NewGoal) -> Result<i64, DbError>;

    /// Newest first.
    async fn list(&self, user_id: i64, params: &ListParams) -> Result<Vec<Goal>, DbError>;

    async fn get_by_id(&self, id: i64) -> Result<Goal, DbError>;

    /// `DbError::NotFound` when no row matched.
    async fn update_by_id(&self, id: i64, changes: &GoalChanges) -> Result<(), DbError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct PgGoalRepository {
    db: PgPool,
}

impl PgGoalRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const SELECT_GOAL: &str = r#"
    SELECT id, name, description, completion_status, start_date,
           end_date AS target_date, created_at, updated_at, user_id
    FROM goals
"#;

/// One `column = $n` per present field, then `updated_at` and the id filter.
fn build_goal_update(id: i64, changes: &GoalChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE goals SET ");
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
        if let Some(done) = changes.completion_status {
            set.push("completion_status = ");
            set.push_bind_unseparated(done);
        }
        if let Some(start) = changes.start_date {
            set.push("start_date = ");
            set.push_bind_unseparated(start);
        }
        if let Some(target) = changes.target_date {
            set.push("end_date = ");
            set.push_bind_unseparated(target);
        }
        set.push("updated_at = now()");
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn create(&self, user_id: i64, goal: &NewGoal) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO goals (name, description, start_date, end_date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(goal.start_date)
        .bind(goal.target_date)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "insert goal failed");
            parse_error(e)
        })
    }

    async fn list(&self, user_id: i64, params: &ListParams) -> Result<Vec<Goal>, DbError> {
        let sql = format!(
            "{SELECT_GOAL} WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, user_id, "list goals failed");
                parse_error(e)
            })
    }

    async fn get_by_id(&self, id: i64) -> Result<Goal, DbError> {
        let sql = format!("{SELECT_GOAL} WHERE id = $1");
        sqlx::query_as::<_, Goal>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, goal_id = id, "get goal failed");
                parse_error(e)
            })
    }

    async fn update_by_id(&self, id: i64, changes: &GoalChanges) -> Result<(), DbError> {
        let result = build_goal_update(id, changes)
            .build()
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, goal_id = id, "update goal failed");
                parse_error(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, goal_id = id, "delete goal failed");
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
    use time::macros::date;

    #[test]
    fn single_field_update() {
        let changes = GoalChanges {
            name: Some("Run a marathon".into()),
            ..Default::default()
        };
        let qb = build_goal_update(7, &changes);
        assert_eq!(
            qb.sql(),
            "UPDATE goals SET name = $1, updated_at = now() WHERE id = $2"
        );
    }

    #[test]
    fn every_field_gets_its_own_placeholder() {
        let changes = GoalChanges {
            name: Some("n".into()),
            description: Some("d".into()),
            completion_status: Some(true),
            start_date: Some(date!(2024 - 01 - 01)),
            target_date: Some(date!(2024 - 12 - 31)),
        };
        let qb = build_goal_update(7, &changes);
        assert_eq!(
            qb.sql(),
            "UPDATE goals SET name = $1, description = $2, completion_status = $3, \
             start_date = $4, end_date = $5, updated_at = now() WHERE id = $6"
        );
    }

    #[test]
    fn target_date_writes_end_date_column() {
        let changes = GoalChanges {
            target_date: Some(date!(2025 - 06 - 01)),
            ..Default::default()
        };
        let sql = build_goal_update(1, &changes).sql().to_string();
        assert!(sql.contains("end_date = $1"));
        assert!(!sql.contains("target_date"));
    }
}
