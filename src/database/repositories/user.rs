use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use super::UserRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserPublicData};
use crate::database::statement::InsertStatement;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError> {
        let sql = InsertStatement::new("users")
            .value("name", user.name.as_str())
            .value("email", user.email.as_str())
            .value("password", user.password_hash.as_str())
            .value("role", user.role.as_str())
            .value("team", user.team.as_str())
            .returning("id")
            .to_sql();

        debug!(email = %user.email, role = %user.role, team = %user.team, "Creating user");
        let row = sql
            .bind()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(row.try_get("id")?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, team, avatar_url FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_public(&self) -> Result<Vec<UserPublicData>, DatabaseError> {
        let users = sqlx::query_as::<_, UserPublicData>("SELECT id, name, avatar_url FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = users.len(), "Loaded public user data");
        Ok(users)
    }
}
