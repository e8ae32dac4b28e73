//! PostgreSQL connection pool setup.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Settings for the PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Holds the pooled connection to the backing store.
pub struct DatabaseConnections {
    pub main: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to PostgreSQL using the given configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let mut options = ConnectOptions::new(&config.url);
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        let main = Database::connect(options).await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connection established"
        );

        Ok(Self { main })
    }
}
