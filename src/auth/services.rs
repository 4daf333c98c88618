use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::auth::{
    dto::{Login, LoginResponse, SignUp},
    jwt::TokenMaker,
    password::{hash_password, verify_password},
    repo::UserRepository,
    repo_types::NewUser,
};
use crate::db::DbError;
use crate::error::ServiceError;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenMaker>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenMaker>) -> Self {
        Self { users, tokens }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn sign_up(&self, input: SignUp) -> Result<i64, ServiceError> {
        input.validate().map_err(|e| {
            warn!(error = %e, "invalid signup");
            ServiceError::from(e)
        })?;

        let password_hash = hash_password(&input.password).map_err(|e| {
            error!(error = %e, "hash_password failed");
            ServiceError::ServiceUnavailable
        })?;

        let new_user = NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            username: input.username,
            password_hash,
        };

        let id = self.users.create(&new_user).await.map_err(|e| match e {
            DbError::Conflict => {
                warn!("username already registered");
                ServiceError::AlreadyExists
            }
            other => {
                error!(error = %other, "create user failed");
                ServiceError::ServiceUnavailable
            }
        })?;

        info!(user_id = id, "user registered");
        Ok(id)
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: Login) -> Result<LoginResponse, ServiceError> {
        input.validate().map_err(|e| {
            warn!(error = %e, "invalid login");
            ServiceError::from(e)
        })?;

        let user = self
            .users
            .find_by_username(&input.username)
            .await
            .map_err(|e| {
                warn!(error = %e, "login lookup failed");
                ServiceError::from_lookup(e)
            })?;

        // A mismatch deliberately reports ServiceUnavailable; the login handler
        // renders every non-NotFound failure as "Bad credentials".
        match verify_password(&input.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = user.id, "login invalid password");
                return Err(ServiceError::ServiceUnavailable);
            }
            Err(e) => {
                error!(error = %e, user_id = user.id, "verify_password failed");
                return Err(ServiceError::ServiceUnavailable);
            }
        }

        let token = self
            .tokens
            .create_token(user.id, &user.username)
            .map_err(|e| {
                error!(error = %e, "token sign failed");
                ServiceError::ServiceUnavailable
            })?;

        info!(user_id = user.id, "user logged in");
        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }
}
