use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vidshelf::app;
use vidshelf::config::settings::AppConfig;
use vidshelf::infrastructure::ffmpeg::tools;
use vidshelf::modules::catalog::service::CatalogService;
use vidshelf::state::AppState;
use vidshelf::workers::batch::run_batch;
use vidshelf::workers::transcoder::Transcoder;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr; stdout belongs to the progress bar.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::new().context("VIDEO_STORAGE_ROOT must be set")?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            serve(config).await
        }
        Commands::Convert { source, output, quiet } => {
            if let Some(source) = source {
                config.source_dir = source;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            convert(config, quiet).await
        }
        Commands::Catalog { output } => {
            let output = output.unwrap_or_else(|| config.catalog_path.clone());
            CatalogService::write(&config.storage_root, &config.poster_base_path, &output)?;
            Ok(())
        }
        Commands::CheckTools => tools::require_all(&config.tools),
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.storage_root)
        .await
        .with_context(|| format!("Failed to create {}", config.storage_root.display()))?;

    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Serving videos from {}", config.storage_root.display());

    let app = app::create_app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn convert(config: AppConfig, quiet: bool) -> Result<()> {
    tools::require_all(&config.tools)?;

    for dir in [&config.source_dir, &config.output_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let transcoder = Transcoder::new(config.tools.clone());
    let transcoder = if quiet { transcoder.quiet() } else { transcoder };

    let summary = run_batch(&config, &transcoder).await;
    if summary.failed > 0 {
        tracing::warn!("{} conversion(s) failed", summary.failed);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
