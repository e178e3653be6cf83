use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sms_relay::{
    config::Config, dispatch::Dispatcher, gateway::GatewayClient, metrics, server::Server, Result,
};

#[derive(Parser)]
#[command(name = "sms-relay", version, about = "Alertmanager webhook to SMS gateway relay")]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    // Initialize logging; SMS_LOG_LEVEL takes debug/info/error
    let _ = dotenvy::dotenv();
    let filter = std::env::var("SMS_LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::load()?;

    metrics::register_metrics();

    info!(
        "Init parameters: SMS_GW_URL={}, SMS_FROM={}, SMS_TO={}, SMS_INSECURE={}",
        config.gateway.url,
        config.gateway.from,
        config.dispatch.recipients,
        config.gateway.insecure
    );

    let gateway = Arc::new(GatewayClient::new(config.gateway.clone())?);
    let dispatcher = Dispatcher::new(gateway, config.dispatch.dispatch_timeout);
    let server = Server::new(&config, dispatcher);

    info!(
        "Listening on {}. Endpoints: /sms, /metrics, /health",
        config.server.addr
    );
    server.start(&config.server.addr).await?;

    Ok(())
}
