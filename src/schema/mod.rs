use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

mod accounts;

pub async fn apply(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(conn);

    accounts::apply(&manager).await?;

    Ok(())
}
