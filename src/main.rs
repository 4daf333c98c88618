use std::{fs::OpenOptions, sync::Arc, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod goals;
mod state;
mod tasks;
mod validation;

#[cfg(test)]
mod testing;

use crate::auth::jwt::TokenMaker;
use crate::config::AppConfig;
use crate::state::AppState;

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "goaltracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .with_target(false)
            .with_ansi(false)
            .json()
            .with_writer(Mutex::new(file))
            .init();
    } else if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = Arc::new(AppConfig::from_env().context("load configuration")?);
    let tokens = Arc::new(TokenMaker::from_config(&config.token).context("build token maker")?);

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let state = AppState::init(config.clone(), tokens, pool.clone());
    let app = app::build_app(state);

    let served = app::serve(app, &config).await;
    pool.close().await;
    tracing::info!("database pool closed");
    served
}
