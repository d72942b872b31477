use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "Account REST API Service";
pub const SERVICE_VERSION: &str = "1.0";

#[derive(Serialize, ToSchema)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = Health)
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "OK" })
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service name and version", body = ServiceInfo)
    )
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: SERVICE_VERSION,
    })
}

pub fn routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}
