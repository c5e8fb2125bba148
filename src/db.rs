use std::time::Duration;

use sqlx::{
    MySqlPool,
    migrate::MigrateError,
    mysql::MySqlPoolOptions,
};
use tracing::info;

use crate::config::Config;

/// Opens the process-wide pool. Handlers borrow connections from it per
/// statement and hand them back on drop.
pub async fn init_db(config: &Config) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    info!(
        max_connections = config.db_max_connections,
        "Database pool ready"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &MySqlPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations applied");
    Ok(())
}
