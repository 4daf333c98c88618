use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    jwt::TokenMaker,
    repo::{PgUserRepository, UserRepository},
    services::AuthService,
};
use crate::config::AppConfig;
use crate::goals::{
    repo::{GoalRepository, PgGoalRepository},
    services::GoalService,
};
use crate::tasks::{
    repo::{PgTaskRepository, TaskRepository},
    services::TaskService,
};

#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub goals: GoalService,
    pub tasks: TaskService,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenMaker>,
    pub services: Services,
}

impl AppState {
    /// Postgres-backed state used by the server binary.
    pub fn init(config: Arc<AppConfig>, tokens: Arc<TokenMaker>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            tokens,
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgGoalRepository::new(db.clone())),
            Arc::new(PgTaskRepository::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        tokens: Arc<TokenMaker>,
        users: Arc<dyn UserRepository>,
        goals: Arc<dyn GoalRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        let goal_service = GoalService::new(goals);
        let services = Services {
            auth: AuthService::new(users, tokens.clone()),
            tasks: TaskService::new(tasks, goal_service.clone()),
            goals: goal_service,
        };
        Self {
            config,
            tokens,
            services,
        }
    }
}
