use dotenv::dotenv;
use invoice_core::api::{create_router, AppState};
use invoice_core::AppConfig;
use tokio::signal;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting invoice builder...");

    let config = AppConfig::from_env()?;
    match config.logo_max_bytes {
        Some(max) => info!("Logo uploads limited to {} bytes", max),
        None => info!("Logo uploads are not size limited (set LOGO_MAX_BYTES to cap them)"),
    }

    let (state, editor_task) = AppState::from_config(&config);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", address, e))?;

    info!(
        "Server listening on {}, printing to {}",
        address,
        config.print_output_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down gracefully...");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    // The router (and with it every editor handle) is gone; the editor
    // task drains and returns the discarded session.
    let editor = editor_task.await?;
    info!(
        "Discarded session with {} line item(s)",
        editor.invoice().items.len()
    );

    Ok(())
}
