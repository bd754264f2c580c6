pub mod companies; // POST /api/root/companies

pub use companies::create as company_create;
