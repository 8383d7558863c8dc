//! QR menu edge router.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  EDGE                         │
//!   Client Request        │  ┌──────────┐   ┌─────────────┐               │
//!   Host: x.qrmenu.app ───┼─▶│  rewrite │──▶│ trace / id  │──┐            │
//!                         │  │ (zone)   │   │ / timeout   │  │            │
//!                         │  └──────────┘   └─────────────┘  ▼            │
//!                         │                           ┌────────────┐      │
//!   Client Response  ◀────┼───────────────────────────│   proxy    │◀─────┼── Application
//!                         │                           └────────────┘      │   (/, /panel,
//!                         │  ┌────────────┐  ┌──────────┐  ┌──────────┐   │    /admin, /menu)
//!                         │  │   config   │  │ metrics  │  │  admin   │   │
//!                         │  └────────────┘  └──────────┘  └──────────┘   │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use qrmenu_edge::admin::{serve_admin, AdminState};
use qrmenu_edge::config::{load_config, load_defaults};
use qrmenu_edge::observability::{logging::init_logging, metrics::init_metrics};
use qrmenu_edge::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "qrmenu-edge")]
#[command(about = "Host-based tenant routing edge for the QR menu platform", long_about = None)]
struct Args {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "QRMENU_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_defaults()?,
    };

    init_logging(&config.observability);
    tracing::info!("qrmenu-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.tenancy.base_url,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config.clone())?;

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(
            server.tenant_router(),
            &config.tenancy.base_url,
            &config.admin.api_key,
        );
        let admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = serve_admin(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
