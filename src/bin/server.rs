use std::sync::Arc;

use framemoji::catalog::Catalog;
use framemoji::constants::CATALOG_PATH;
use framemoji::env_config::{init_base_path, server_port, ServerConfig};
use framemoji::server::{create_router, AppState};
use framemoji::store::select_store;

#[tokio::main]
async fn main() {
    init_base_path();
    println!("Starting framemoji API server...");

    let catalog = match Catalog::load(CATALOG_PATH) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to load catalog from {}: {}", CATALOG_PATH, e);
            std::process::exit(1);
        }
    };
    println!("Loaded {} puzzles", catalog.len());

    let config = Arc::new(ServerConfig::from_env());
    if config.dev_mode() {
        println!("Dev mode: no FRAMEMOJI_DAILY_SECRET set, answers are exposed in /daily");
    }
    let store = select_store(&config);

    let app = create_router(AppState {
        catalog,
        store,
        config,
    });

    let port = server_port();
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    println!("Server is running on port {}. Press Ctrl+C to stop.", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("\nStopping server...");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
