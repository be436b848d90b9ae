// Output rendering: PDF documents and HTML previews.
// Both consume entries in the order the caller arranged them and honor the same
// DirectionMode, so a preview and a download never disagree on direction or order.

pub mod font;
pub mod pdf;
pub mod preview;

use thiserror::Error;

use crate::layout::engine::{layout, LayoutError};
use crate::layout::geometry::{DirectionMode, LayoutParams, PageOrientation};

pub use font::FontConfig;
pub use pdf::PdfOptions;
pub use preview::render_preview;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("placement {index} is on page {page}, after page {previous} was already started")]
    PageOrder {
        index: usize,
        page: usize,
        previous: usize,
    },

    #[error("placement {index} is on page {page}, but the document has {page_count} pages")]
    PageOutOfRange {
        index: usize,
        page: usize,
        page_count: usize,
    },
}

/// Lays out `entries` and emits the finished PDF.
///
/// `orientation` falls back to the mode's default (vertical → portrait,
/// horizontal → landscape). Font size is taken from `params`.
pub fn render_document<S: AsRef<str>>(
    entries: &[S],
    mode: DirectionMode,
    orientation: Option<PageOrientation>,
    params: &LayoutParams,
    font: FontConfig,
    title: Option<String>,
) -> Result<Vec<u8>, RenderError> {
    let geometry = params.geometry_for(mode, orientation);
    let computed = layout(entries, &geometry, mode, params)?;

    tracing::debug!(
        %mode,
        entries = entries.len(),
        pages = computed.page_count,
        placements = computed.placements.len(),
        "Layout computed"
    );

    let options = PdfOptions {
        font,
        font_size_pt: params.font_size_pt,
        title,
    };
    pdf::emit_pdf(&computed.placements, computed.page_count, geometry, &options)
}
