use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storage_events::{api, catalog::Catalog, config::Config, AppState};

/// Output format selected by `LOG_FORMAT`.
enum LogFormat {
    /// Cloud Logging structured entries
    Gcp,
    Json,
    Text,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "gcp" => LogFormat::Gcp,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Gcp => registry.with(tracing_stackdriver::layer()).init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::from_env());

    let config = Config::load()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        project_id = %config.project_id,
        ack_deadline_ms = config.pubsub.ack_deadline.as_millis() as u64,
        max_message_size = config.pubsub.max_message_size,
        test_mode = config.test_mode,
        "Starting storage-events"
    );

    let catalog = Catalog::open(&config.node.data_dir)?;
    info!(data_dir = %config.node.data_dir, "Catalog ready");

    let bind_address = config.node.bind_address.clone();
    let app = api::create_router(Arc::new(AppState::new(config, catalog)));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Accepting push deliveries");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A signal that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight deliveries");
}
