use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{entities::accounts, repo::accounts::AccountsRepo};

const NAME_MAX: usize = 64;
const EMAIL_MAX: usize = 64;
const ADDRESS_MAX: usize = 256;
const PHONE_NUMBER_MAX: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("account payload must be a JSON object")]
    NotAnObject,
    #[error("invalid account payload: {0}")]
    InvalidField(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Wire shape accepted on create and update. Fields other than these are
/// ignored, including `id` and `date_joined`, which the server owns.
#[derive(Deserialize, ToSchema)]
pub struct AccountPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// A validated create/update payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInput {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl AccountInput {
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|err| ValidationError::MalformedJson(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        // serde would happily read a struct out of a positional array
        if !value.is_object() {
            return Err(ValidationError::NotAnObject);
        }
        let payload = AccountPayload::deserialize(value)
            .map_err(|err| ValidationError::InvalidField(err.to_string()))?;
        Self::try_from(payload)
    }
}

impl TryFrom<AccountPayload> for AccountInput {
    type Error = ValidationError;

    fn try_from(payload: AccountPayload) -> Result<Self, Self::Error> {
        let name = required(payload.name, "name", NAME_MAX)?;
        let email = required(payload.email, "email", EMAIL_MAX)?;
        let address = optional(payload.address, "address", ADDRESS_MAX)?;
        let phone_number = optional(payload.phone_number, "phone_number", PHONE_NUMBER_MAX)?;

        Ok(Self {
            name,
            email,
            address,
            phone_number,
        })
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    match optional(value, field, max)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(value) if value.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        other => Ok(other),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub date_joined: NaiveDate,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
            phone_number: model.phone_number,
            date_joined: model.date_joined,
        }
    }
}

#[async_trait]
pub trait AccountsService: Send + Sync {
    async fn create(&self, input: AccountInput) -> Result<Account, sea_orm::DbErr>;
    async fn find(&self, id: i32) -> Result<Option<Account>, sea_orm::DbErr>;
    async fn all(&self) -> Result<Vec<Account>, sea_orm::DbErr>;
    /// Replaces every mutable field of an existing account. Callers check
    /// existence first; a missing row surfaces as a storage error.
    async fn update(&self, id: i32, input: AccountInput) -> Result<Account, sea_orm::DbErr>;
    async fn delete(&self, id: i32) -> Result<(), sea_orm::DbErr>;
}

pub struct AccountsServiceImpl {
    accounts_repo: std::sync::Arc<dyn AccountsRepo>,
}

impl AccountsServiceImpl {
    pub fn new(accounts_repo: std::sync::Arc<dyn AccountsRepo>) -> Self {
        Self { accounts_repo }
    }
}

#[async_trait]
impl AccountsService for AccountsServiceImpl {
    async fn create(&self, input: AccountInput) -> Result<Account, sea_orm::DbErr> {
        let model = accounts::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            address: Set(input.address),
            phone_number: Set(input.phone_number),
            date_joined: Set(chrono::Utc::now().date_naive()),
        };

        let inserted = self.accounts_repo.insert(model).await?;
        Ok(inserted.into())
    }

    async fn find(&self, id: i32) -> Result<Option<Account>, sea_orm::DbErr> {
        let found = self.accounts_repo.find_by_id(id).await?;
        Ok(found.map(Account::from))
    }

    async fn all(&self) -> Result<Vec<Account>, sea_orm::DbErr> {
        let rows = self.accounts_repo.list_all().await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn update(&self, id: i32, input: AccountInput) -> Result<Account, sea_orm::DbErr> {
        let model = accounts::ActiveModel {
            id: Unchanged(id),
            name: Set(input.name),
            email: Set(input.email),
            address: Set(input.address),
            phone_number: Set(input.phone_number),
            date_joined: NotSet,
        };

        let updated = self.accounts_repo.update(model).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> Result<(), sea_orm::DbErr> {
        let removed = self.accounts_repo.delete_by_id(id).await?;
        if removed == 0 {
            tracing::debug!(id, "delete: account already absent");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repo::accounts::SeaOrmAccountsRepo, state::SeaOrmDatabaseClient, test_support};
    use serde_json::json;
    use std::sync::Arc;

    async fn service() -> AccountsServiceImpl {
        let conn = test_support::memory_connection().await.unwrap();
        let db = Arc::new(SeaOrmDatabaseClient::from_connection(conn));
        AccountsServiceImpl::new(Arc::new(SeaOrmAccountsRepo::new(db)))
    }

    fn input(name: &str) -> AccountInput {
        AccountInput {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            address: Some("1 Main St".to_string()),
            phone_number: None,
        }
    }

    #[test]
    fn parse_accepts_required_fields_only() {
        let parsed =
            AccountInput::parse(br#"{"name":"Alice","email":"a@example.com"}"#).unwrap();
        assert_eq!(parsed.name, "Alice");
        assert_eq!(parsed.email, "a@example.com");
        assert_eq!(parsed.address, None);
        assert_eq!(parsed.phone_number, None);
    }

    #[test]
    fn parse_ignores_unknown_and_server_owned_fields() {
        let parsed = AccountInput::from_value(json!({
            "id": 77,
            "name": "Bob",
            "email": "bob@example.com",
            "address": null,
            "phone_number": "555-0101",
            "date_joined": "1999-01-01",
            "nickname": "bobby"
        }))
        .unwrap();
        assert_eq!(parsed.phone_number.as_deref(), Some("555-0101"));
        assert_eq!(parsed.address, None);
    }

    #[test]
    fn parse_rejects_missing_or_blank_required_fields() {
        assert_eq!(
            AccountInput::from_value(json!({"name": "not enough data"})),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            AccountInput::from_value(json!({"email": "x@example.com"})),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            AccountInput::from_value(json!({"name": "  ", "email": "x@example.com"})),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            AccountInput::from_value(json!({"name": "X", "email": null})),
            Err(ValidationError::MissingField("email"))
        );
    }

    #[test]
    fn parse_fails_closed_on_wrong_shapes() {
        assert_eq!(
            AccountInput::from_value(json!(["Alice", "a@example.com"])),
            Err(ValidationError::NotAnObject)
        );
        assert!(matches!(
            AccountInput::from_value(json!({"name": 42, "email": "a@example.com"})),
            Err(ValidationError::InvalidField(_))
        ));
        assert!(matches!(
            AccountInput::parse(b"{not json"),
            Err(ValidationError::MalformedJson(_))
        ));
        assert!(matches!(
            AccountInput::parse(b""),
            Err(ValidationError::MalformedJson(_))
        ));
    }

    #[test]
    fn parse_enforces_column_widths() {
        let long_phone = "1".repeat(PHONE_NUMBER_MAX + 1);
        assert_eq!(
            AccountInput::from_value(json!({
                "name": "Alice",
                "email": "a@example.com",
                "phone_number": long_phone
            })),
            Err(ValidationError::TooLong {
                field: "phone_number",
                max: PHONE_NUMBER_MAX
            })
        );
    }

    #[test]
    fn account_serializes_with_iso_date() {
        let account = Account {
            id: 7,
            name: "Alice".to_string(),
            email: "a@example.com".to_string(),
            address: None,
            phone_number: Some("555".to_string()),
            date_joined: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({
                "id": 7,
                "name": "Alice",
                "email": "a@example.com",
                "address": null,
                "phone_number": "555",
                "date_joined": "2024-03-01"
            })
        );
    }

    #[tokio::test]
    async fn create_assigns_id_and_todays_date() {
        let service = service().await;
        let created = service.create(input("Alice")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.date_joined, chrono::Utc::now().date_naive());
        assert_eq!(service.find(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_date_joined() {
        let service = service().await;
        let created = service.create(input("Alice")).await.unwrap();

        let replacement = AccountInput {
            name: "Alicia".to_string(),
            email: "alicia@example.com".to_string(),
            address: None,
            phone_number: Some("555-0199".to_string()),
        };
        let updated = service.update(created.id, replacement).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.address, None);
        assert_eq!(updated.phone_number.as_deref(), Some("555-0199"));
        assert_eq!(updated.date_joined, created.date_joined);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_storage_error() {
        let service = service().await;
        assert!(service.update(999_999, input("Nobody")).await.is_err());
        assert!(service.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_then_find_returns_none() {
        let service = service().await;
        let created = service.create(input("Alice")).await.unwrap();

        service.delete(created.id).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert_eq!(service.find(created.id).await.unwrap(), None);
    }
}
