use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::types::CompanyId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub company_id: CompanyId,
    /// Set for users who work tickets as a technician
    #[serde(default)]
    pub technician_id: Option<Uuid>,
}

/// What clients get to see about a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: CompanyId,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        role: Role,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into().to_lowercase(),
            password_hash: crate::auth::hash_password(password),
            role,
            company_id,
            technician_id: None,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            company_id: self.company_id,
            technician_id: self.technician_id,
        }
    }
}
