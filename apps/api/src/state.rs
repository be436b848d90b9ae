use std::sync::Arc;

use crate::collection::store::EntryStore;
use crate::layout::LayoutParams;
use crate::render::FontConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntryStore>,
    /// Spacing constants for both writing directions.
    pub layout_params: LayoutParams,
    /// Font handed to the PDF emitter on every render; there is no global font table.
    pub font: FontConfig,
}
