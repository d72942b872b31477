use sea_orm_migration::prelude::*;

/// Creates the `accounts` table when it is missing. Sticks to portable column
/// types so the same bootstrap runs on Postgres and SQLite.
pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if manager.has_table("accounts").await? {
        return Ok(());
    }

    manager
        .create_table(
            Table::create()
                .table(Accounts::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Accounts::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Accounts::Name).string_len(64).not_null())
                .col(ColumnDef::new(Accounts::Email).string_len(64).not_null())
                .col(ColumnDef::new(Accounts::Address).string_len(256))
                .col(ColumnDef::new(Accounts::PhoneNumber).string_len(32))
                .col(ColumnDef::new(Accounts::DateJoined).date().not_null())
                .to_owned(),
        )
        .await?;

    tracing::info!("schema: created table accounts");
    Ok(())
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    Email,
    Address,
    PhoneNumber,
    DateJoined,
}
