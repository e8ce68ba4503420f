use std::process::ExitCode;

use marketplace_blog::db::{establish_connection_pool_sized, run_pending_migrations};
use marketplace_blog::models::config::ServerConfig;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match establish_connection_pool_sized(&config.database_url, config.pool_size) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database `{}`: {e}", config.database_url);
            return ExitCode::FAILURE;
        }
    };

    match run_pending_migrations(&pool) {
        Ok(0) => log::info!("Database `{}` is up to date", config.database_url),
        Ok(applied) => log::info!("Applied {applied} migration(s) to `{}`", config.database_url),
        Err(e) => {
            log::error!("Failed to run migrations: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
