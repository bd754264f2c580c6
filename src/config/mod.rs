use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::types::Priority;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub relay: RelayConfig,
    pub sla: SlaConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Load demo companies, users and technicians into an empty in-memory store
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Buffered events per tenant room before slow subscribers start lagging
    pub room_capacity: usize,
    pub heartbeat_secs: u64,
    pub join_timeout_secs: u64,
    /// Bounded mailbox between the client socket reader and the UI loop
    pub client_mailbox: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaConfig {
    pub low_hours: i64,
    pub medium_hours: i64,
    pub high_hours: i64,
    pub critical_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl SlaConfig {
    pub fn hours_for(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Low => self.low_hours,
            Priority::Medium => self.medium_hours,
            Priority::High => self.high_hours,
            Priority::Critical => self.critical_hours,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("MESOB_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("MESOB_SEED_DEMO") {
            self.server.seed_demo_data = v.parse().unwrap_or(self.server.seed_demo_data);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Relay overrides
        if let Ok(v) = env::var("RELAY_ROOM_CAPACITY") {
            self.relay.room_capacity = v.parse().unwrap_or(self.relay.room_capacity);
        }
        if let Ok(v) = env::var("RELAY_HEARTBEAT_SECS") {
            self.relay.heartbeat_secs = v.parse().unwrap_or(self.relay.heartbeat_secs);
        }
        if let Ok(v) = env::var("RELAY_JOIN_TIMEOUT_SECS") {
            self.relay.join_timeout_secs = v.parse().unwrap_or(self.relay.join_timeout_secs);
        }
        if let Ok(v) = env::var("RELAY_CLIENT_MAILBOX") {
            self.relay.client_mailbox = v.parse().unwrap_or(self.relay.client_mailbox);
        }

        // SLA overrides
        if let Ok(v) = env::var("SLA_LOW_HOURS") {
            self.sla.low_hours = v.parse().unwrap_or(self.sla.low_hours);
        }
        if let Ok(v) = env::var("SLA_MEDIUM_HOURS") {
            self.sla.medium_hours = v.parse().unwrap_or(self.sla.medium_hours);
        }
        if let Ok(v) = env::var("SLA_HIGH_HOURS") {
            self.sla.high_hours = v.parse().unwrap_or(self.sla.high_hours);
        }
        if let Ok(v) = env::var("SLA_CRITICAL_HOURS") {
            self.sla.critical_hours = v.parse().unwrap_or(self.sla.critical_hours);
        }

        // Client overrides
        if let Ok(v) = env::var("CLIENT_POLL_INTERVAL_SECS") {
            self.client.poll_interval_secs = v.parse().unwrap_or(self.client.poll_interval_secs);
        }
        if let Ok(v) = env::var("CLIENT_REQUEST_TIMEOUT_SECS") {
            self.client.request_timeout_secs = v.parse().unwrap_or(self.client.request_timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                seed_demo_data: true,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "mesob-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            relay: RelayConfig {
                room_capacity: 256,
                heartbeat_secs: 30,
                join_timeout_secs: 10,
                client_mailbox: 128,
            },
            sla: SlaConfig::standard(),
            client: ClientConfig {
                poll_interval_secs: 15,
                request_timeout_secs: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 5000,
                seed_demo_data: true,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.mesob.example".to_string()],
            },
            relay: RelayConfig {
                room_capacity: 512,
                heartbeat_secs: 30,
                join_timeout_secs: 10,
                client_mailbox: 256,
            },
            sla: SlaConfig::standard(),
            client: ClientConfig {
                poll_interval_secs: 30,
                request_timeout_secs: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5000,
                seed_demo_data: false,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 8,
                enable_cors: true,
                cors_origins: vec!["https://helpdesk.mesob.example".to_string()],
            },
            relay: RelayConfig {
                room_capacity: 1024,
                heartbeat_secs: 25,
                join_timeout_secs: 5,
                client_mailbox: 256,
            },
            sla: SlaConfig::standard(),
            client: ClientConfig {
                poll_interval_secs: 30,
                request_timeout_secs: 10,
            },
        }
    }
}

impl SlaConfig {
    fn standard() -> Self {
        Self {
            low_hours: 72,
            medium_hours: 24,
            high_hours: 8,
            critical_hours: 4,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.server.seed_demo_data);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.client.poll_interval_secs, 15);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.server.seed_demo_data);
        // Production must be given a secret explicitly
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.client.poll_interval_secs, 30);
    }

    #[test]
    fn sla_hours_shrink_with_priority() {
        let sla = SlaConfig::standard();
        assert!(sla.hours_for(Priority::Low) > sla.hours_for(Priority::Medium));
        assert!(sla.hours_for(Priority::Medium) > sla.hours_for(Priority::High));
        assert!(sla.hours_for(Priority::High) > sla.hours_for(Priority::Critical));
    }
}
