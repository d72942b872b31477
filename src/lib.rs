//! Account REST API service: CRUD over `Account` records stored through
//! sea-orm, served with axum.

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handler;
pub mod logging;
pub mod openapi;
pub mod repo;
pub mod schema;
pub mod service;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{openapi::ApiDoc, state::AppState};

/// Builds the full HTTP surface for the given state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handler::health::routes())
        .merge(handler::accounts::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
