use clap::Parser;
use lead_funnel_lib::config::RelayConfig;
use lead_funnel_lib::file_storage::{default_data_dir, ensure_dir};
use lead_funnel_lib::server::{self, ServerAppState};
use lead_funnel_lib::shutdown::{register_signal_handlers, ShutdownState};
use std::path::PathBuf;

/// Lead funnel server - captures and routes marketing site leads
#[derive(Parser, Debug)]
#[command(name = "funnel-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Data directory for leads and progress snapshots
    /// (defaults to ~/.funnel-server)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Allowed CORS origin, repeatable (default: any origin)
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let shutdown_state = ShutdownState::new();
    if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
        log::warn!("Failed to register signal handlers: {}", e);
    }

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            RelayConfig::default()
        }
    };

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    if let Err(e) = ensure_dir(&data_dir) {
        eprintln!("Failed to create data directory: {}", e);
        std::process::exit(1);
    }
    log::info!("Data directory: {}", data_dir.display());

    let state = ServerAppState::new(config, &data_dir, shutdown_state);

    let cors_origins = if cli.cors_origins.is_empty() {
        None
    } else {
        Some(cli.cors_origins)
    };

    if let Err(e) = server::run_server(cli.port, &cli.bind, state, cors_origins).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
