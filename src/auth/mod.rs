use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::types::CompanyId;

/// Every role known to the help desk. Authorization decisions go through
/// [`Role::allows`] and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Technician,
    #[serde(rename = "admin")]
    CompanyAdmin,
    SuperAdmin,
    SystemAdmin,
}

/// Things a caller may try to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FileTicket,
    FileTicketOnBehalf,
    WorkTicket,
    AssignTicket,
    ManageTechnicians,
    SendBroadcast,
    SendGlobalBroadcast,
    ViewDashboard,
    ViewAllTenants,
    ManageCompanies,
}

impl Role {
    pub fn allows(&self, action: Action) -> bool {
        use Action::*;

        match self {
            Role::Employee => matches!(action, FileTicket),
            Role::Technician => matches!(action, FileTicket | WorkTicket),
            Role::CompanyAdmin => matches!(
                action,
                FileTicket
                    | FileTicketOnBehalf
                    | WorkTicket
                    | AssignTicket
                    | ManageTechnicians
                    | SendBroadcast
                    | ViewDashboard
            ),
            Role::SuperAdmin => !matches!(action, ManageCompanies),
            Role::SystemAdmin => true,
        }
    }

    /// Global roles see every tenant; everyone else is pinned to their own company
    pub fn is_global(&self) -> bool {
        self.allows(Action::ViewAllTenants)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Technician => "technician",
            Role::CompanyAdmin => "admin",
            Role::SuperAdmin => "super_admin",
            Role::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "employee" => Ok(Role::Employee),
            "technician" => Ok(Role::Technician),
            "admin" | "company_admin" => Ok(Role::CompanyAdmin),
            "super_admin" => Ok(Role::SuperAdmin),
            "system_admin" => Ok(Role::SystemAdmin),
            _ => Err(format!("unknown role '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub role: Role,
    pub company_id: CompanyId,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        name: String,
        role: Role,
        company_id: CompanyId,
        technician_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            name,
            role,
            company_id,
            technician_id,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.exp - self.iat
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

fn jwt_secret() -> Result<&'static str, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(jwt_secret()?.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret()?.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Salted SHA-256, stored as `salt$hexdigest`
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employees_can_only_file_tickets() {
        assert!(Role::Employee.allows(Action::FileTicket));
        assert!(!Role::Employee.allows(Action::WorkTicket));
        assert!(!Role::Employee.allows(Action::AssignTicket));
        assert!(!Role::Employee.is_global());
    }

    #[test]
    fn company_admins_stay_inside_their_tenant() {
        assert!(Role::CompanyAdmin.allows(Action::AssignTicket));
        assert!(Role::CompanyAdmin.allows(Action::SendBroadcast));
        assert!(!Role::CompanyAdmin.allows(Action::SendGlobalBroadcast));
        assert!(!Role::CompanyAdmin.is_global());
    }

    #[test]
    fn only_system_admins_manage_companies() {
        assert!(Role::SuperAdmin.is_global());
        assert!(!Role::SuperAdmin.allows(Action::ManageCompanies));
        assert!(Role::SystemAdmin.allows(Action::ManageCompanies));
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::CompanyAdmin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
        assert_eq!("system-admin".parse::<Role>().unwrap(), Role::SystemAdmin);
    }

    #[test]
    fn password_round_trip() {
        let stored = hash_password("s3cret");
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("wrong", &stored));
        assert!(!verify_password("s3cret", "not-a-hash"));
    }

    #[test]
    fn jwt_round_trip_keeps_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "Tigist".into(), Role::Technician, 3, None);
        let token = generate_jwt(&claims).unwrap();
        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.role, Role::Technician);
        assert_eq!(decoded.company_id, 3);
        assert!(validate_jwt("garbage").is_err());
    }
}
