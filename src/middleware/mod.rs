pub mod auth;
pub mod response;
pub mod validate_company;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use validate_company::{validate_company_middleware, ValidatedCompany};
