// handlers/elevated/mod.rs - Elevated handlers (system administrators)
//
// Security Level: JWT + ManageCompanies
// Route Prefix: /api/root/*

pub mod root; // Platform administration
