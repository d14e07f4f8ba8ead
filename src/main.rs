use anyhow::{Context, Result};
use locale_router::config::Config;
use locale_router::i18n::MessageCatalog;
use locale_router::server::{self, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_router=info".parse()?),
        )
        .init();

    info!("Starting locale router");

    // Load configuration from environment; refuse to start on invalid locale settings
    let config = Config::from_env()?;
    let routing = config
        .routing()
        .context("Invalid locale configuration")?;

    let codes: Vec<_> = routing.registry().list().iter().map(|l| l.code.as_str()).collect();
    info!(
        "Locales: [{}], default: {}, detection: {}",
        codes.join(", "),
        routing.registry().default_locale(),
        routing.locale_detection()
    );
    info!("Excluded prefixes: {:?}", routing.excluded_prefixes());

    let catalog = MessageCatalog::new(&config.messages_dir);
    for locale in catalog.missing_bundles(routing.registry()) {
        warn!(
            "No message bundle for '{}' in {}; its pages will return 404",
            locale,
            catalog.dir().display()
        );
    }

    let app = server::router(AppState::new(routing, catalog));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("✓ Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
