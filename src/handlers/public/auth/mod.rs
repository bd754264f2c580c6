// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition. Everything else under /auth lives behind the JWT layer.

pub mod login; // POST /auth/login - authenticate and get JWT

pub use login::login;
