use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creativity_duel::{
    llm,
    pack::PackStore,
    server::{build_router, ServerConfig},
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creativity_duel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Creativity Duel...");

    let server_config = ServerConfig::from_env();
    let packs = PackStore::from_env();
    tracing::info!(
        "Packs in {}: {:?}",
        packs.dir().display(),
        packs.list_packs()
    );

    let llm_config = llm::LlmConfig::from_env();
    let state = Arc::new(AppState::new_with_llm(packs, &llm_config));

    let app = build_router(state, server_config.static_dir.clone());

    let addr = server_config.addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
