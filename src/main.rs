//! Contribution API entry point.

use std::net::IpAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contribution_api::api::{create_router, AppState};
use contribution_api::config::Config;
use contribution_api::metrics;
use contribution_api::store::{DocumentKind, Stores};
use contribution_api::utils::shutdown_signal;

/// 401(k) contribution settings API.
#[derive(Parser, Debug)]
#[command(name = "contribution-api")]
#[command(about = "Serves contribution settings and year-to-date data as JSON documents")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Address to bind (overrides HOST).
    #[arg(long)]
    host: Option<IpAddr>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to bind (overrides HOST).
        #[arg(long)]
        host: Option<IpAddr>,

        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not install the Prometheus recorder.
        #[arg(long)]
        no_metrics: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_logging(&config, args.verbose);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve {
            host,
            port,
            no_metrics,
        }) => cmd_serve(config, host, port, !no_metrics).await,
        None => cmd_serve(config, args.host, args.port, true).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("contribution_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CONTRIBUTION API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}", config.socket_addr());
    for kind in [DocumentKind::Contribution, DocumentKind::Ytd] {
        let path = config.document_path(kind);
        let state = if path.exists() { "present" } else { "absent, default served" };
        println!("  {} File: {} ({})", kind, path.display(), state);
    }
    println!(
        "  CORS Origins: {}",
        config.origins().collect::<Vec<_>>().join(", ")
    );
    println!("  CORS Credentials: {}", config.cors_allow_credentials);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    mut config: Config,
    host: Option<IpAddr>,
    port: Option<u16>,
    with_metrics: bool,
) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let mut app_state = AppState::new(Stores::from_config(&config));
    if with_metrics {
        match metrics::install_recorder() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled: {}", e),
        }
    }

    info!("Contribution document: {}", config.contribution_file.display());
    info!("YTD document: {}", config.ytd_file.display());

    let router = create_router(app_state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
