//! CmdRelay - Main Entry Point
//! Chat relay + optional JSON-RPC console

mod config;
mod logging;

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use cmdrelay_api_rpc::{RpcServer, RpcServerConfig};
use cmdrelay_core::application::{resolve_bot_token, shutdown_channel, Dispatcher, RelayLoop};
use cmdrelay_core::port::id_provider::UuidProvider;
use cmdrelay_core::port::time_provider::SystemTimeProvider;
use cmdrelay_core::port::{CommandRegistry, ExecutionLog};
use cmdrelay_infra_sqlite::{
    create_pool, run_migrations, SqliteCommandRegistry, SqliteExecutionLog, SqliteTokenStore,
};
use cmdrelay_infra_system::ShellExecutor;
use cmdrelay_transport_telegram::{TelegramConfig, TelegramTransport};

use config::RelayConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = RelayConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    let _log_guard = logging::init_logging(config.log_format, config.log_dir.as_deref())
        .context("Failed to initialize logging")?;

    info!("CmdRelay v{} starting...", VERSION);
    info!(db_path = %config.db_path, "Initializing database...");

    // 3. Initialize database
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }
    let pool = create_pool(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Resolve the bot token
    let token_store = SqliteTokenStore::new(pool.clone());
    let (token, source) =
        resolve_bot_token(&token_store, config.telegram_token.clone(), prompt_token)
            .await
            .map_err(|e| anyhow::anyhow!("Bot token unavailable: {}", e))?;
    info!(source = ?source, "Bot token resolved");

    // 5. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let registry: Arc<dyn CommandRegistry> = Arc::new(SqliteCommandRegistry::new(
        pool.clone(),
        time_provider.clone(),
    ));
    let execution_log: Arc<dyn ExecutionLog> = Arc::new(SqliteExecutionLog::new(
        pool.clone(),
        time_provider.clone(),
    ));
    let executor = Arc::new(ShellExecutor::new(time_provider.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        execution_log.clone(),
        executor,
        Arc::new(UuidProvider),
    ));

    let transport = TelegramTransport::new(TelegramConfig {
        api_url: config.telegram_api_url.clone(),
        token,
        poll_timeout_secs: config.poll_timeout_secs,
    })
    .map_err(|e| anyhow::anyhow!("Telegram client setup failed: {}", e))?;

    // 6. Start JSON-RPC console (opt-in)
    let rpc_handle = if config.rpc_enabled {
        let rpc_config = RpcServerConfig {
            port: config.rpc_port,
            ..Default::default()
        };
        let server = RpcServer::new(
            rpc_config,
            dispatcher.clone(),
            registry.clone(),
            execution_log.clone(),
        );
        let handle = server
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;
        Some(handle)
    } else {
        info!("JSON-RPC console disabled");
        None
    };

    // 7. Start relay loop
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let relay = RelayLoop::new(Arc::new(transport), dispatcher);
    let relay_handle = tokio::spawn(async move {
        if let Err(e) = relay.run(shutdown_rx).await {
            tracing::error!(error = ?e, "Relay loop failed");
        }
    });

    info!("Bot is running. Press Ctrl+C to stop");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 9. Graceful shutdown
    shutdown_tx.shutdown();
    if let Some(handle) = rpc_handle {
        handle
            .stop()
            .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    }
    // The relay task returns once every lane has answered what it holds
    if tokio::time::timeout(SHUTDOWN_GRACE, relay_handle).await.is_err() {
        tracing::warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "Commands still running at shutdown; their results will not be logged"
        );
    }
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}

/// Ask for the bot token on the terminal
fn prompt_token() -> std::io::Result<String> {
    print!("Enter your Telegram bot token: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
