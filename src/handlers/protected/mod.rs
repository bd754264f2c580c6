// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/*
// Middleware: JWT validation + company validation
//
// Every handler receives the caller as `Extension<AuthUser>` and checks the
// role through `AuthUser::require` before touching data. Non-global roles
// are pinned to their own company.

pub mod auth; // Session introspection
pub mod broadcasts; // Announcements to the relay
pub mod companies; // Tenant directory
pub mod dashboard; // Aggregated statistics
pub mod technicians; // Technician directory and duty status
pub mod tickets; // Ticket lifecycle
