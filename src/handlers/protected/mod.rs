// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, so handlers can take
// `Extension<AuthUser>` for the caller's identity.

pub mod incidents; // Incident create, list, detail and narrow updates
pub mod users;     // Public user directory

pub use incidents::*;
pub use users::users_get;
