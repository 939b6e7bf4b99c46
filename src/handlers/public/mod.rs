// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and the read-only lookup lists used to fill the
// incident forms.

pub mod auth;
pub mod options;

pub use auth::*;
pub use options::options_get;
