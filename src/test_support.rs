#![cfg(test)]
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::schema;

/// Fresh in-memory SQLite database with the schema applied. A single pooled
/// connection keeps every query on the same in-memory database.
pub async fn memory_connection() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    schema::apply(&conn).await?;
    Ok(conn)
}
