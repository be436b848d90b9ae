mod collection;
mod config;
mod errors;
mod layout;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::collection::store::EntryStore;
use crate::config::Config;
use crate::layout::LayoutParams;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Utakai v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the entry store (creates the data directory)
    let store = EntryStore::open(config.data_dir.clone())?;
    info!(data_dir = %store.data_dir().display(), "Entry store ready");

    // A4 pages, 14pt glyphs, 30mm margins (20mm bottom for horizontal lines)
    let layout_params = LayoutParams::default();
    info!(
        font = ?config.pdf_font,
        font_size_pt = layout_params.font_size_pt,
        "Layout parameters loaded"
    );

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        layout_params,
        font: config.pdf_font,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
