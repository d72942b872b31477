use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder};

use crate::{entities::accounts, state::DatabaseClient};

#[async_trait]
pub trait AccountsRepo: Send + Sync {
    async fn insert(
        &self,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i32) -> Result<Option<accounts::Model>, sea_orm::DbErr>;
    async fn list_all(&self) -> Result<Vec<accounts::Model>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr>;
    /// Returns the number of rows removed (0 when the row was already gone).
    async fn delete_by_id(&self, id: i32) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmAccountsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAccountsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountsRepo for SeaOrmAccountsRepo {
    async fn insert(
        &self,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn list_all(&self) -> Result<Vec<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: accounts::ActiveModel,
    ) -> Result<accounts::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: i32) -> Result<u64, sea_orm::DbErr> {
        let result = accounts::Entity::delete_by_id(id)
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
