use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{api, state::AppState, ws};

/// Listen address and static asset location
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Load `PORT` and `STATIC_DIR`, keeping defaults for anything unset or invalid
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT '{}'", raw);
                defaults.port
            }),
            Err(_) => defaults.port,
        };
        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self { port, static_dir }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn build_router(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    let api_routes = Router::new()
        .route("/api/packs", get(api::list_packs).post(api::save_pack))
        .route("/api/packs/{name}", get(api::get_pack))
        .route("/api/packs/{name}/export", get(api::export_pack));

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
