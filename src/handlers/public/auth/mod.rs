// handlers/public/auth/mod.rs - Public authentication handlers
//
// Account creation and token acquisition. Neither route requires a session.

pub mod login;    // POST /auth/login - verify credentials, issue session cookie
pub mod register; // POST /auth/register - create a new account

pub use login::login_post;
pub use register::register_post;
