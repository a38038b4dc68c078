//! emberkv - An In-Memory Key-Value Store
//!
//! The main entry point: parses options, restores the keyspace from the
//! snapshot file, runs the replica handshake when configured, and serves
//! connections until SIGINT or SIGTERM.

use emberkv::commands::CommandHandler;
use emberkv::config::{initial_config, ServerOptions};
use emberkv::connection::{handle_connection, ConnectionStats};
use emberkv::replication;
use emberkv::snapshot::{self, SnapshotError};
use emberkv::storage::{start_expiry_sweeper, Database, Keyspace};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = ServerOptions::from_args();

    // Set up logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let config = initial_config(&options);

    // Restore the keyspace from the snapshot file, if one exists
    let databases = load_databases(&config);
    let keyspace = Arc::new(Keyspace::with_databases(config, databases));
    info!("Keyspace initialized");

    // Start the background expiry sweeper
    let _sweeper = start_expiry_sweeper(Arc::clone(&keyspace));

    // Introduce ourselves to the upstream when running as a replica
    if let Some((host, port)) = &options.replicaof {
        match replication::perform_handshake(host, *port, options.port).await {
            Ok(()) => {
                info!(upstream = %format!("{}:{}", host, port), "Replica handshake complete")
            }
            Err(e) => warn!(error = %e, "Replica handshake failed, serving anyway"),
        }
    }

    // Bind the TCP listener
    let listener = match TcpListener::bind(options.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", options.bind_address(), e);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", options.bind_address());

    let stats = Arc::new(ConnectionStats::new());

    // Main accept loop, cut short by a termination signal
    tokio::select! {
        _ = accept_loop(listener, keyspace, stats) => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping server...");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Loads databases from `<dir>/<dbfilename>`. Any failure leaves the
/// server starting with empty databases.
fn load_databases(config: &HashMap<String, String>) -> HashMap<u8, Database> {
    let path = snapshot::snapshot_path(
        config.get("dir").map(String::as_str),
        config.get("dbfilename").map(String::as_str),
    );

    match snapshot::load(&path) {
        Ok((_, databases)) => {
            let keys: usize = databases.values().map(|db| db.store.len()).sum();
            info!(path = %path.display(), keys = keys, "Snapshot loaded");
            databases
        }
        Err(SnapshotError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot found, starting empty");
            HashMap::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot load failed, starting empty");
            HashMap::new()
        }
    }
}

/// Main loop that accepts incoming connections
async fn accept_loop(
    listener: TcpListener,
    keyspace: Arc<Keyspace>,
    stats: Arc<ConnectionStats>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Create a command handler for this connection
                let handler = CommandHandler::new(Arc::clone(&keyspace));
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}
