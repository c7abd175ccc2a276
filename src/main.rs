//! cascade server binary.
//!
//! Loads configuration, registers the demo middleware chain, and serves
//! until interrupted.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cascade::config::{load_config, ServerConfig};
use cascade::http::Server;

#[derive(Parser, Debug)]
#[command(name = "cascade", about = "Minimal middleware-chaining HTTP server")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener address.
    #[arg(long)]
    address: Option<String>,

    /// Override the listener port.
    #[arg(long)]
    port: Option<u16>,
}

// The design is a single-threaded event loop: all connection tasks
// interleave on one thread only at await points.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(address) = args.address {
        config.listener.address = address;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        address = %config.listener.address,
        port = config.listener.port,
        max_connections = config.listener.max_connections,
        "Configuration loaded"
    );

    let mut server = Server::new(config);

    // Request logger: observes, then continues the chain.
    server.use_handler(|req, res, next| {
        tracing::info!(method = %req.method, url = %req.url, "Request received");
        next.run(req, res);
    });

    // Terminal handler: decides the response, does not continue.
    server.use_handler(|req, res, _next| {
        res.status = 200;
        res.set_header("content-type", "text/plain; charset=utf-8");
        res.body = format!("hello from cascade ({} {})\n", req.method, req.url);
    });

    server.listen().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
