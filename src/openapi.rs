use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    handler,
    handler::health::{Health, ServiceInfo},
    service::accounts::{Account, AccountPayload},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Account REST API Service", version = "1.0"),
    paths(
        handler::health::index,
        handler::health::health,
        handler::accounts::create_account,
        handler::accounts::list_accounts,
        handler::accounts::get_account,
        handler::accounts::update_account,
        handler::accounts::delete_account
    ),
    components(schemas(Health, ServiceInfo, Account, AccountPayload, ErrorResponse)),
    tags(
        (name = "health", description = "Liveness and service metadata"),
        (name = "accounts", description = "Account lifecycle")
    )
)]
pub struct ApiDoc;
