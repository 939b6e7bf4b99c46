use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Stored user row. The password column holds a bcrypt hash.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub team: String,
    pub avatar_url: Option<String>,
}

/// Fields any authenticated user may see about another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserPublicData {
    pub id: i32,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserPublicData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "name is required"))]
    #[serde(default)]
    pub name: String,
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 8, max = 72, message = "password must be between 8 and 72 characters"))]
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[serde(default)]
    pub password: String,
}

/// Row the repository inserts on registration. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub team: String,
}
