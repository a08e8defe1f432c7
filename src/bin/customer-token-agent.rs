use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use customer_token_agent::server;
use customer_token_agent::server::token_routes::AgentTokenManager;
use customer_token_agent::storage::FileStore;
use customer_token_agent::transport::HttpTransport;
use customer_token_agent::utils::config_loader;
use customer_token_agent::utils::logging;
use customer_token_agent::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "customer-token-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);
    let settings = &service_config.settings;

    // -------------------------------
    // 2. Create transport and persistent store
    // -------------------------------

    let transport = HttpTransport::new(Duration::from_millis(settings.transport.timeout_ms))?;
    let store = FileStore::new(&settings.storage.path);
    info!("configuration store at {}", store.path().display());

    // -------------------------------
    // 3. Build the token manager, apply startup configuration
    // -------------------------------

    let manager: Arc<AgentTokenManager> =
        Arc::new(AgentTokenManager::new(transport, store, &settings.token).await);
    if let Some(request) = service_config.customer_token.clone() {
        manager.configure(request).await;
    }

    // -------------------------------
    // 4. Serve configure / token routes until ctrl-c
    // -------------------------------

    info!("Service starting...");
    tokio::select! {
        res = server::server::start(settings, manager) => res?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    Ok(())
}
