mod config;
mod db;
mod errors;
mod invoice;
mod layout;
mod models;
mod pages;
mod render;
mod routes;
mod state;

use anyhow::Result;
use chrono::Local;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::invoice::numbering::{FiscalYear, InvoiceNumber};
use crate::invoice::store::PgInvoiceStore;
use crate::layout::Letterhead;
use crate::pages::Pages;
use crate::render::Logo;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing database settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Performa v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database).await?;
    init_schema(&db).await?;

    let letterhead = Letterhead::default();
    let logo = Logo::load(Path::new(&config.logo_path)).map(Arc::new);

    let example = InvoiceNumber::first(
        &config.invoice_prefix,
        FiscalYear::containing(Local::now().date_naive()),
    );
    let pages = Pages::compile(&letterhead.title, &example.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to compile page templates: {e}"))?;
    info!(
        prefix = %config.invoice_prefix,
        rounding = ?config.amount_rounding,
        "Invoice settings loaded"
    );

    // Build app state
    let state = AppState {
        store: Arc::new(PgInvoiceStore::new(db)),
        config: config.clone(),
        letterhead: Arc::new(letterhead),
        logo,
        pages: Arc::new(pages),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
