pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod seed;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{HelpDeskStore, StoreError};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config;

/// Pick the backend: Postgres when DATABASE_URL is set, otherwise an in-memory store
pub async fn open_store() -> Result<Arc<dyn HelpDeskStore>, StoreError> {
    let store: Arc<dyn HelpDeskStore> = if DatabaseManager::is_configured() {
        let pg = PgStore::new(DatabaseManager::pool().await?);
        pg.ensure_schema().await?;
        info!("Using Postgres document store");
        Arc::new(pg)
    } else if crate::is_production!() {
        return Err(StoreError::ConfigMissing("DATABASE_URL"));
    } else {
        warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
        Arc::new(MemoryStore::new())
    };

    if config::config().server.seed_demo_data {
        seed::seed_demo(store.as_ref()).await?;
    }

    Ok(store)
}
