use inkbook_app::app::api::routes;
use inkbook_app::config::ConfigHandler;
use inkbook_app::store_handler::StoreProviderHandler;
use inkbook_core::config::load_config;
use inkbook_service::scheduling::SchedulingPolicy;
use inkbook_service::store::connect;
use salvo::conn::TcpListener;
use salvo::logging::Logger;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Inkbook studio scheduler");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let policy = SchedulingPolicy::from_config(&config.studio)?;
    tracing::info!(
        timezone = %policy.timezone,
        opens_at = %policy.opens_at,
        closes_at = %policy.closes_at,
        "Studio policy resolved"
    );

    let store = connect(&config).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(Logger::new())
        .hoop(StoreProviderHandler { store })
        .hoop(ConfigHandler {
            settings: config.clone(),
            policy,
        })
        .push(routes()?);

    tracing::info!(origin = %config.server.origin(), "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
