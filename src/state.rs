use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::{
    config::Config,
    repo::accounts::{AccountsRepo, SeaOrmAccountsRepo},
    service::{
        accounts::{AccountsService, AccountsServiceImpl},
        config::{ConfigService, ConfigServiceImpl},
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let conn = crate::db::connect(config).await?;
        crate::schema::apply(&conn).await?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

/// Everything a handler needs, built once at startup and shared read-only.
pub struct AppState {
    accounts: Arc<dyn AccountsService>,
    config: Arc<dyn ConfigService>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, DbErr> {
        let db = Arc::new(SeaOrmDatabaseClient::connect(&config).await?);
        Ok(Self::build(db, config))
    }

    /// Wraps an already-open connection whose schema has been applied.
    pub fn from_connection(conn: DatabaseConnection, config: Config) -> Arc<Self> {
        Self::build(Arc::new(SeaOrmDatabaseClient::from_connection(conn)), config)
    }

    fn build(db: Arc<dyn DatabaseClient>, config: Config) -> Arc<Self> {
        let accounts_repo: Arc<dyn AccountsRepo> = Arc::new(SeaOrmAccountsRepo::new(db));
        let accounts = Arc::new(AccountsServiceImpl::new(accounts_repo));
        let config = Arc::new(ConfigServiceImpl::from_config(config));

        Arc::new(Self { accounts, config })
    }

    pub fn accounts(&self) -> &dyn AccountsService {
        self.accounts.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}
