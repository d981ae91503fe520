use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connect to the SQLite database at `url` and bring its schema up to date.
pub async fn init_pool(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(url);
    if url.contains(":memory:") {
        // Every connection to an in-memory database sees its own empty copy.
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(3600));
    } else {
        opts.max_connections(5);
    }
    opts.sqlx_logging(false);

    let db = Database::connect(opts).await?;
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    sqlx::migrate!("./migrations")
        .run(db.get_sqlite_connection_pool())
        .await
        .map_err(|e| {
            tracing::error!("Database migration failed: {e}");
            DbErr::Migration(e.to_string())
        })?;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}
