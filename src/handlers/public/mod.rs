// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service information, liveness, and token acquisition.
//
// Security Level: None (completely public access)
// Route Prefix: No /api prefix (e.g., /auth/*)

pub mod auth;
pub mod info;

pub use info::{health, root};
