use std::sync::Arc;

use crate::config::Config;
use crate::invoice::store::InvoiceStore;
use crate::layout::Letterhead;
use crate::pages::Pages;
use crate::render::Logo;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Production: `PgInvoiceStore`.
    pub store: Arc<dyn InvoiceStore>,
    pub config: Config,
    pub letterhead: Arc<Letterhead>,
    /// `None` when no logo file was found; the slot is left blank.
    pub logo: Option<Arc<Logo>>,
    pub pages: Arc<Pages>,
}
