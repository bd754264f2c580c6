// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth) → Elevated (system admin)
//
pub mod elevated; // Tier 3: System administrators only (/api/root/*)
pub mod protected; // Tier 2: JWT authentication required (/api/*)
pub mod public; // Tier 1: No authentication required (/, /health, /auth/*)
