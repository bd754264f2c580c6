/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tenant key. Companies are static reference data identified by a small number.
pub type CompanyId = i64;

/// Ticket operations that flow through the hook pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Assign,
    Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketStatus {
    New,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

/// Technician's self-reported availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyStatus {
    Online,
    #[serde(rename = "On-Site")]
    OnSite,
    Break,
    Offline,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::New,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::Assigned => "Assigned",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Open tickets count toward technician workload and SLA tracking
    pub fn is_open(&self) -> bool {
        !matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

impl DutyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::Online => "Online",
            DutyStatus::OnSite => "On-Site",
            DutyStatus::Break => "Break",
            DutyStatus::Offline => "Offline",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DutyStatus::Online | DutyStatus::OnSite)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parsing is case-insensitive and tolerant of '-', '_' and ' ' so CLI input like
// "in-progress" or "on_site" works.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("unknown priority '{}'", s)),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "new" => Ok(TicketStatus::New),
            "assigned" => Ok(TicketStatus::Assigned),
            "inprogress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!("unknown status '{}'", s)),
        }
    }
}

impl FromStr for DutyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "online" => Ok(DutyStatus::Online),
            "onsite" => Ok(DutyStatus::OnSite),
            "break" => Ok(DutyStatus::Break),
            "offline" => Ok(DutyStatus::Offline),
            _ => Err(format!("unknown duty status '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let duty: DutyStatus = serde_json::from_str("\"On-Site\"").unwrap();
        assert_eq!(duty, DutyStatus::OnSite);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("in-progress".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert_eq!("ON_SITE".parse::<DutyStatus>().unwrap(), DutyStatus::OnSite);
        assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn only_online_and_on_site_are_available() {
        assert!(DutyStatus::Online.is_available());
        assert!(DutyStatus::OnSite.is_available());
        assert!(!DutyStatus::Break.is_available());
        assert!(!DutyStatus::Offline.is_available());
    }
}
