pub mod campaigns;
pub mod submissions;
pub mod users;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::AppConfig;

/// Create a SeaORM connection pool with bounded connect/acquire timeouts.
pub async fn create_pool(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(config.db_acquire_timeout)
        .acquire_timeout(config.db_acquire_timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}
