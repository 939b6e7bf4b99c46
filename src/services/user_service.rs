use std::sync::Arc;

use tracing::{info, warn};

use super::validation::validate_input;
use super::ServiceError;
use crate::auth::{hash_password, verify_password};
use crate::config::UserConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{LoginInput, NewUser, RegisterInput, User, UserPublicData};
use crate::database::repositories::UserRepository;

/// Same message for unknown email and wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid Email or password";
pub const USER_EXISTS: &str = "user already exists";

pub struct UserService {
    users: Arc<dyn UserRepository>,
    defaults: UserConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, defaults: UserConfig, bcrypt_cost: u32) -> Self {
        Self {
            users,
            defaults,
            bcrypt_cost,
        }
    }

    /// Create an account with the configured default role and team
    pub async fn register(&self, input: RegisterInput) -> Result<i32, ServiceError> {
        validate_input(&input)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            warn!(email = %input.email, "Registration for existing email");
            return Err(ServiceError::Authentication(USER_EXISTS.to_string()));
        }

        let password_hash = hash_password(input.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: self.defaults.default_role.clone(),
            team: self.defaults.default_team.clone(),
        };

        // A concurrent registration can still win the race past the pre-check.
        let id = self.users.create_user(&new_user).await.map_err(|err| match err {
            DatabaseError::UniqueViolation(_) => ServiceError::Authentication(USER_EXISTS.to_string()),
            other => other.into(),
        })?;

        info!(user_id = id, "Registered user");
        Ok(id)
    }

    /// Check credentials and return the stored user
    pub async fn login(&self, input: LoginInput) -> Result<User, ServiceError> {
        validate_input(&input)?;

        let Some(user) = self.users.find_by_email(&input.email).await? else {
            return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(input.password, user.password.clone()).await? {
            return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    pub async fn list_public(&self) -> Result<Vec<UserPublicData>, ServiceError> {
        Ok(self.users.list_public().await?)
    }
}
