//! Configuration for Users API

use core_config::{
    AppInfo, FromEnv, app_info, env_flag, env_optional, env_required, server::ServerConfig,
};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    /// `None` when DATABASE_URL is unset; the service then keeps users in memory
    pub database: Option<PostgresConfig>,
    pub run_migrations: bool,
    pub cors_allowed_origin: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            run_migrations: env_flag("RUN_MIGRATIONS", true)?,
            cors_allowed_origin: env_required("CORS_ALLOWED_ORIGIN")?,
        })
    }
}
