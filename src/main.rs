// src/main.rs

use std::sync::Arc;

use catalog_admin::build_router;
use catalog_admin::config::AppConfig;
use catalog_admin::product_service::HttpProductService;
use catalog_admin::sessions::PageSessions;
use catalog_admin::state::AppState;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Inicjalizacja systemu logowania (tracing)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Inicjalizacja panelu produktów...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Nieprawidłowa konfiguracja: {}", err);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "API produktów: {}, polityka liczb: {}",
        config.api_base_url,
        config.numeric_policy
    );

    let service = HttpProductService::new(&config.api_base_url);
    let sessions = PageSessions::new(
        Arc::new(service),
        config.numeric_policy,
        config.session_idle,
    );

    let app_state = AppState {
        sessions: Arc::new(sessions),
        card_settings: config.card_settings,
        static_dir: config.static_dir.clone(),
    };

    let app = build_router(app_state);

    tracing::info!("Serwer nasłuchuje na {}", config.bind_addr);
    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Nie można powiązać adresu {}: {}", config.bind_addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Błąd serwera: {}", e);
    }
}
