//! Kube State Exporter CLI
//!
//! Serves StatefulSet metrics read from a JSON snapshot, or prints a
//! single collection pass with `--once`.

use std::path::PathBuf;

use clap::Parser;
use kube_state_exporter::{
    collector::CollectorRegistry,
    config::{ConfigError, FileConfig, ServerConfig},
    metrics::Telemetry,
    resources::statefulset,
    store::FileStore,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "kube-state-exporter", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON snapshot of StatefulSets; overrides the configured one.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Port to serve on; overrides the configured bind address.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print one collection pass to stdout and exit.
    #[arg(long)]
    once: bool,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Kube State Exporter v{}", kube_state_exporter::VERSION);

    if let Err(e) = run(args) {
        error!(error = %e, "Exporter failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), BoxError> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if let Some(snapshot) = args.snapshot {
        config.store.snapshot = Some(snapshot);
    }
    if let Some(port) = args.port {
        config.server = ServerConfig::with_port(port);
    }

    let snapshot = config.store.snapshot.clone().ok_or(ConfigError::MissingSnapshot)?;
    let store = FileStore::new(snapshot);
    info!(snapshot = %store.path().display(), "Reading StatefulSets from snapshot");

    let telemetry = Telemetry::new()?;
    let statefulsets =
        statefulset::collector(store, &config.options)?.with_telemetry(telemetry.clone());

    let mut registry = CollectorRegistry::new();
    registry.register(Box::new(statefulsets))?;

    if args.once {
        print!("{}", registry.gather()?);
        return Ok(());
    }

    serve(config.server, registry, telemetry)
}

#[cfg(feature = "server")]
fn serve(
    config: ServerConfig,
    registry: CollectorRegistry,
    telemetry: Telemetry,
) -> Result<(), BoxError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let server = kube_state_exporter::metrics::MetricsServer::new(config, registry, telemetry);
    runtime.block_on(server.run())?;
    Ok(())
}

#[cfg(not(feature = "server"))]
fn serve(
    _config: ServerConfig,
    registry: CollectorRegistry,
    _telemetry: Telemetry,
) -> Result<(), BoxError> {
    tracing::warn!(
        kinds = ?registry.kinds(),
        "Built without the `server` feature; use --once to print metrics"
    );
    Err("scrape server not available in this build".into())
}
