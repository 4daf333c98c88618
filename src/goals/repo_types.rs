use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

time::serde::format_description!(goal_date, Date, "[day]-[month]-[year]");

/// Goal row; `target_date` is stored in the `end_date` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub completion_status: bool,
    #[serde(with = "goal_date::option")]
    pub start_date: Option<Date>,
    #[serde(with = "goal_date::option")]
    pub target_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user_id: i64,
}

/// Validated insert for a goal; dates already parsed.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub start_date: Option<Date>,
    pub target_date: Option<Date>,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GoalChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completion_status: Option<bool>,
    pub start_date: Option<Date>,
    pub target_date: Option<Date>,
}
