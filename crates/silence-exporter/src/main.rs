//! alertmanager-silences-exporter - Alertmanager silences as Prometheus metrics.

use clap::Parser;
use silence_collector::{AlertmanagerClient, SilenceCollector, without_userinfo};
use silence_exporter::{Cli, ExporterConfig, ExporterServer, LogFormat};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        error!(error = %e, "exporter failed");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ExporterConfig::load(cli.config_file.as_deref())?;

    let client = AlertmanagerClient::new(config.client_config())?;
    info!(url = %without_userinfo(client.silences_url()?), "querying Alertmanager");

    let collector = SilenceCollector::new(client, config.collector_settings());
    let server = ExporterServer::new(collector, cli.telemetry_path)?;

    server
        .serve_with_shutdown(cli.listen_address, shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
