use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CompanyId, DutyStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub company_id: CompanyId,
    pub duty_status: DutyStatus,
    pub is_available: bool,
    /// Derived from open tickets; only present when workload was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_tickets: Option<u32>,
}

impl Technician {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        company_id: CompanyId,
        duty_status: DutyStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            department: department.into(),
            company_id,
            duty_status,
            is_available: duty_status.is_available(),
            current_tickets: None,
        }
    }

    pub fn set_duty_status(&mut self, status: DutyStatus) {
        self.duty_status = status;
        self.is_available = status.is_available();
    }
}
