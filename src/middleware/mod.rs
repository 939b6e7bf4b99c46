pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser, SESSION_COOKIE};
pub use extract::{JsonBody, PathParam, QueryParams};
pub use response::{ApiResponse, ApiResult};
