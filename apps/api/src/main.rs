//! Caresuite role administration API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod bootstrap_seed;
mod dto;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use caresuite_core::AppError;
use caresuite_domain::PermissionCatalog;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, RoleStoreBackend, init_tracing};
use crate::api_services::RolePorts;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let catalog = Arc::new(PermissionCatalog::clinic());

    let ports = match &config.role_store {
        RoleStoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool =
                api_services::connect_and_migrate(database_url.as_str(), *max_connections).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            RolePorts::postgres(catalog, &pool)
        }
        RoleStoreBackend::Memory => {
            warn!("using in-memory role store; roles are lost on restart");
            RolePorts::in_memory(catalog)
        }
    };

    if let Some(subject) = config.bootstrap_admin_subject.as_deref() {
        bootstrap_seed::run(&ports, subject).await?;
    }

    let app_state = api_services::build_app_state(&ports);
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "caresuite-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
