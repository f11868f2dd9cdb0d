mod config;
mod db;
mod errors;
mod fanout;
mod generation;
mod llm_client;
mod messaging;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::fanout::dispatcher::Dispatcher;
use crate::fanout::scheduler::CycleRunner;
use crate::generation::generator::LlmContentGenerator;
use crate::llm_client::LlmClient;
use crate::messaging::commands::poll_commands;
use crate::messaging::TelegramClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{ContentStore, PgContentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PrepAI bot v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL; the pool lives for the whole process and is
    // closed on the way out.
    let pool = create_pool(&config.database_url).await?;
    ensure_schema(&pool).await?;
    let store: Arc<dyn ContentStore> = Arc::new(PgContentStore::new(pool.clone()));

    // Initialize generation provider
    let llm = LlmClient::new(
        config.openrouter_api_url.clone(),
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.request_timeout,
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    let generator = Arc::new(LlmContentGenerator::new(llm));

    // Initialize messaging channel
    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.bot_token,
        config.request_timeout,
    )?);

    let dispatcher = Dispatcher::new(store.clone(), generator, telegram.clone());
    let cycles = Arc::new(CycleRunner::new(Arc::new(dispatcher)));

    if config.run_once {
        match cycles.try_run().await {
            Some(Ok(report)) => info!("Single cycle complete: {report:?}"),
            Some(Err(e)) => error!("Cycle aborted, could not load subscribers: {e}"),
            None => error!("Cycle already running"),
        }
        pool.close().await;
        return Ok(());
    }

    // Periodic cycles
    {
        let cycles = cycles.clone();
        let period = config.cycle_interval;
        tokio::spawn(async move { cycles.run_every(period).await });
    }

    // Subscription commands
    if config.poll_commands {
        let store = store.clone();
        let telegram = telegram.clone();
        tokio::spawn(async move { poll_commands(store.as_ref(), &telegram).await });
    } else {
        info!("Command polling disabled");
    }

    let app = build_router(AppState { cycles }).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}
