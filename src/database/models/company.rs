use serde::{Deserialize, Serialize};

use crate::types::CompanyId;

/// Tenant reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: CompanyId,
    pub name: String,
    pub initials: String,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        let name = name.into();
        let initials = initials_of(&name);
        Self { id, name, initials }
    }
}

/// "Abay Bank S.C." -> "ABS"
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_initials_from_words() {
        assert_eq!(initials_of("Mesob Trading PLC"), "MTP");
        assert_eq!(initials_of("abay  bank"), "AB");
        assert_eq!(Company::new(7, "Ethio Telecom").initials, "ET");
    }
}
