use std::sync::Arc;
use tokio::signal;
use tracing::info;

use room_core::{RoomRegistry, ShortCode, WordList};
use room_server::{
    config::Config, create_routes, room_service::RoomService, websocket::ConnectionManager,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting word room server...");

    let config = Config::new();

    let word_list = match std::fs::read_to_string(&config.words_file)
        .map_err(anyhow::Error::from)
        .and_then(|raw| WordList::parse(&raw))
    {
        Ok(words) => words,
        Err(e) => {
            tracing::error!("Failed to load word list from '{}': {}", config.words_file, e);
            tracing::error!("Set WORDS_FILE to a file with one lowercase word per line.");
            std::process::exit(1);
        }
    };
    info!(
        "Loaded {} words from {}",
        word_list.len(),
        config.words_file
    );

    let connection_manager = Arc::new(ConnectionManager::new());
    let registry = RoomRegistry::new(Box::new(ShortCode::new(config.room_code_length)));
    let room_service = Arc::new(RoomService::new(
        registry,
        Arc::new(word_list),
        connection_manager.clone(),
    ));

    let routes = create_routes(
        connection_manager,
        room_service,
        config.public_dir.clone(),
    );

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
