use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use scribble_core::WordBank;
use scribble_server::{
    config::{Config, StoreBackend},
    create_routes,
    rooms::RoomRegistry,
    websocket::ConnectionManager,
};
use scribble_store::{
    MemoryStore, RoomRepository, SqlStore, StateStore, connection::connect_and_migrate,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Scribble Room server...");

    let config = Config::new();
    let connection_manager = Arc::new(ConnectionManager::new());

    let words = match &config.words_file {
        Some(path) => match WordBank::from_file(path) {
            Ok(words) => {
                info!("Loaded {} words from {}", words.len(), path);
                words
            }
            Err(e) => {
                tracing::error!("Failed to load word list: {}", e);
                tracing::error!("Unset WORDS_FILE to use the built-in list.");
                std::process::exit(1);
            }
        },
        None => {
            info!("Using built-in word list");
            WordBank::default_words()
        }
    };

    let store: Arc<dyn StateStore> = match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory state store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Sqlite => match connect_and_migrate().await {
            Ok(db) => {
                info!("Using SQLite state store");
                Arc::new(SqlStore::new(db))
            }
            Err(e) => {
                tracing::error!("Failed to connect to database and run migrations: {}", e);
                std::process::exit(1);
            }
        },
    };

    let rooms = Arc::new(RoomRegistry::new(
        RoomRepository::new(store),
        connection_manager.clone(),
        Arc::new(words),
        config.game_settings(),
    ));

    let routes = create_routes(connection_manager.clone(), rooms.clone());

    // Retire rooms nobody is connected to
    let sweep_rooms = rooms.clone();
    let sweep_interval = Duration::from_secs(config.room_sweep_seconds.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let removed = sweep_rooms.sweep_idle_rooms().await;
            if removed > 0 {
                info!(
                    "Retired {} idle rooms, {} still active",
                    removed,
                    sweep_rooms.room_count()
                );
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
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
