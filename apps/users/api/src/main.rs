//! Users API - REST server for user management

use axum::Router;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = match &config.database {
        Some(pg) => {
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(pg.clone(), None).await?;
            if config.run_migrations {
                run_migrations::<Migrator>(&db, config.app.name).await?;
            }
            Some(db)
        }
        None => {
            warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
            None
        }
    };

    let state = AppState { config, db };
    let app = build_app(&state)?;

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = db.close().await {
                warn!("Failed to close PostgreSQL pool: {}", e);
            }
        }
    })
    .await?;

    info!("Users API shutdown complete");
    Ok(())
}

/// API under `/api`, docs, `/health` and `/ready`
fn build_app(state: &AppState) -> std::io::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(
        api::routes(state),
        &state.config.cors_allowed_origin,
    )?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone())))
}
