pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod repositories;

pub use dynamodb::*;
pub use memory::*;
pub use models::*;
pub use repositories::*;

use shared::{Config, StoreBackend};
use std::sync::Arc;

/// Opens the store selected by `config`. Called once at process start; the
/// returned handle is shared by every request.
pub async fn connect_repository(config: &Config) -> SharedTodoRepository {
    match &config.store {
        StoreBackend::DynamoDb {
            table,
            endpoint,
            region,
        } => {
            let db = DynamoDbClient::new(table, endpoint.as_deref(), region.as_deref()).await;
            tracing::info!(table = %table, endpoint = ?endpoint, "using DynamoDB todo store");
            Arc::new(DynamoTodoRepository::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory todo store, data is lost on exit");
            Arc::new(InMemoryTodoRepository::default())
        }
    }
}
