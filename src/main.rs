//! Entry point for `message-echo`.
//!
//! Everything protocol-shaped lives in the library; this file owns logger
//! setup, argument parsing, and the Ctrl-C handler that stops the server.

use std::net::IpAddr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;

use message_echo::server::{Server, ServerConfig, DEFAULT_PORT};

/// UDP message echo server: prints each datagram's header and known bodies,
/// then echoes the datagram back to its sender unchanged.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Local address to bind.
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// UDP port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info so the operational log is visible without RUST_LOG set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ServerConfig {
        bind_addr: cli.bind,
        port: cli.port,
        ..ServerConfig::default()
    };

    let server = Server::bind(config).await?;

    // Ctrl-C interrupts the blocking receive and lets the socket close cleanly.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    server.run(shutdown_rx).await?;
    log::info!("server stopped");
    Ok(())
}
