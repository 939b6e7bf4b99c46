// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (session token required)

pub mod protected; // /users, /incidents/*
pub mod public;    // /auth/*, /options/*
