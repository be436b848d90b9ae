//! PDF emission.
//!
//! Draws a placement sequence onto A4 pages using pdf-writer. The emitter does no
//! layout of its own: every placement is shown at its own coordinates on its own
//! page, in sequence order, and later text may overlap earlier text.

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Content as ContentStream, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::layout::engine::{Content, Placement};
use crate::layout::geometry::PageGeometry;
use crate::render::font::FontConfig;
use crate::render::RenderError;

/// Resource name of the single font on every page.
const FONT_RESOURCE: Name<'static> = Name(b"F1");

/// PDF output options.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub font: FontConfig,
    pub font_size_pt: f32,
    /// Written to the document info dictionary when present.
    pub title: Option<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions {
            font: FontConfig::default(),
            font_size_pt: 14.0,
            title: None,
        }
    }
}

/// A validated, paginated view over a placement sequence.
#[derive(Debug)]
pub struct Document<'a> {
    geometry: PageGeometry,
    pages: Vec<&'a [Placement]>,
}

impl<'a> Document<'a> {
    /// Splits `placements` into exactly `page_count` pages (at least 1).
    ///
    /// Pages nobody refers to stay blank. Fails if the page indices ever decrease
    /// or a placement lands past the last page.
    pub fn paginate(
        placements: &'a [Placement],
        page_count: usize,
        geometry: PageGeometry,
    ) -> Result<Self, RenderError> {
        let page_count = page_count.max(1);
        let blank: &'a [Placement] = &[];
        let mut pages = vec![blank; page_count];
        let mut current = 0usize;
        let mut start = 0usize;

        for (index, placement) in placements.iter().enumerate() {
            if placement.page >= page_count {
                return Err(RenderError::PageOutOfRange {
                    index,
                    page: placement.page,
                    page_count,
                });
            }
            if placement.page < current {
                return Err(RenderError::PageOrder {
                    index,
                    page: placement.page,
                    previous: current,
                });
            }
            if placement.page > current {
                pages[current] = &placements[start..index];
                current = placement.page;
                start = index;
            }
        }
        pages[current] = &placements[start..];

        Ok(Document { geometry, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serializes the document.
    pub fn to_pdf(&self, options: &PdfOptions) -> Vec<u8> {
        let mut refs = RefAllocator::new();
        let catalog_id = refs.next();
        let page_tree_id = refs.next();
        let font_id = refs.next();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);

        let page_ids: Vec<(Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (refs.next(), refs.next()))
            .collect();

        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        let media_box = Rect::new(0.0, 0.0, self.geometry.width, self.geometry.height);

        for (placements, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut page = pdf.page(*page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(*content_id);

            let mut resources = page.resources();
            resources.fonts().pair(FONT_RESOURCE, font_id);
            resources.finish();
            page.finish();

            let content = draw_page(placements, options);
            pdf.stream(*content_id, &content.finish());
        }

        write_font(&mut pdf, &mut refs, font_id, options.font);

        if let Some(title) = &options.title {
            let info_id = refs.next();
            pdf.document_info(info_id)
                .title(TextStr(title.as_str()))
                .producer(TextStr(concat!("utakai ", env!("CARGO_PKG_VERSION"))));
        }

        debug!(
            pages = self.page_count(),
            placements = self.pages.iter().map(|p| p.len()).sum::<usize>(),
            "PDF document written"
        );

        pdf.finish()
    }
}

/// Paginates `placements` and serializes the result in one step.
pub fn emit_pdf(
    placements: &[Placement],
    page_count: usize,
    geometry: PageGeometry,
    options: &PdfOptions,
) -> Result<Vec<u8>, RenderError> {
    let document = Document::paginate(placements, page_count, geometry)?;
    Ok(document.to_pdf(options))
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Sequential object ids starting at 1.
struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    fn new() -> Self {
        RefAllocator { next: 1 }
    }

    fn next(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

fn draw_page(placements: &[Placement], options: &PdfOptions) -> ContentStream {
    let mut content = ContentStream::new();
    let mut glyph_buf = [0u8; 4];

    for placement in placements {
        let text: &str = match &placement.content {
            Content::Glyph(ch) => ch.encode_utf8(&mut glyph_buf),
            Content::Line(line) => line,
        };
        let encoded = options.font.encode(text);

        content.begin_text();
        content.set_font(FONT_RESOURCE, options.font_size_pt);
        content.next_line(placement.x, placement.y);
        content.show(Str(&encoded));
        content.end_text();
    }

    content
}

fn write_font(pdf: &mut Pdf, refs: &mut RefAllocator, font_id: Ref, font: FontConfig) {
    match font {
        FontConfig::Mincho => {
            let cid_font_id = refs.next();
            let descriptor_id = refs.next();

            pdf.type0_font(font_id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"UniJIS-UCS2-H"))
                .descendant_font(cid_font_id);

            pdf.cid_font(cid_font_id)
                .subtype(CidFontType::Type0)
                .base_font(Name(font.base_font()))
                .system_info(SystemInfo {
                    registry: Str(b"Adobe"),
                    ordering: Str(b"Japan1"),
                    supplement: 2,
                })
                .font_descriptor(descriptor_id)
                .default_width(1000.0);

            // Metrics of the standard HeiseiMin-W3 descriptor.
            pdf.font_descriptor(descriptor_id)
                .name(Name(font.base_font()))
                .flags(FontFlags::SERIF | FontFlags::SYMBOLIC)
                .bbox(Rect::new(-123.0, -257.0, 1001.0, 910.0))
                .italic_angle(0.0)
                .ascent(723.0)
                .descent(-241.0)
                .cap_height(709.0)
                .stem_v(69.0);
        }
        FontConfig::Helvetica => {
            pdf.type1_font(font_id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{Margins, PageOrientation};

    fn a4() -> PageGeometry {
        PageGeometry::a4(PageOrientation::Portrait, Margins::uniform(85.0))
    }

    fn line(page: usize, y: f32, text: &str) -> Placement {
        Placement {
            page,
            x: 85.0,
            y,
            content: Content::Line(text.to_string()),
        }
    }

    fn helvetica() -> PdfOptions {
        PdfOptions {
            font: FontConfig::Helvetica,
            ..PdfOptions::default()
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn count_pages(pdf: &[u8]) -> usize {
        let needle = b"/Type /Page";
        pdf.windows(needle.len() + 1)
            .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
            .count()
    }

    #[test]
    fn test_paginate_groups_by_page() {
        let placements = vec![
            line(0, 700.0, "a"),
            line(0, 680.0, "b"),
            line(1, 700.0, "c"),
        ];
        let document = Document::paginate(&placements, 2, a4()).unwrap();
        assert_eq!(document.page_count(), 2);
        assert_eq!(document.pages[0].len(), 2);
        assert_eq!(document.pages[1].len(), 1);
    }

    #[test]
    fn test_paginate_keeps_skipped_pages_blank() {
        let placements = vec![line(0, 700.0, "a"), line(3, 700.0, "b")];
        let document = Document::paginate(&placements, 4, a4()).unwrap();
        assert_eq!(document.page_count(), 4);
        let sizes: Vec<usize> = document.pages.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_paginate_empty_is_one_blank_page() {
        let document = Document::paginate(&[], 1, a4()).unwrap();
        assert_eq!(document.page_count(), 1);
        assert!(document.pages[0].is_empty());
    }

    #[test]
    fn test_paginate_rejects_decreasing_pages() {
        let placements = vec![line(1, 700.0, "a"), line(0, 700.0, "b")];
        let err = Document::paginate(&placements, 2, a4()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::PageOrder {
                index: 1,
                page: 0,
                previous: 1
            }
        ));
    }

    #[test]
    fn test_paginate_rejects_page_past_count() {
        let placements = vec![line(0, 700.0, "a"), line(2, 700.0, "b")];
        let err = Document::paginate(&placements, 2, a4()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::PageOutOfRange {
                index: 1,
                page: 2,
                page_count: 2
            }
        ));
    }

    #[test]
    fn test_paginate_emits_trailing_blank_pages_up_to_count() {
        let placements = vec![line(0, 700.0, "a")];
        let document = Document::paginate(&placements, 3, a4()).unwrap();
        let sizes: Vec<usize> = document.pages.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![1, 0, 0]);

        let bytes = emit_pdf(&placements, 3, a4(), &helvetica()).unwrap();
        assert_eq!(count_pages(&bytes), 3);
    }

    #[test]
    fn test_pdf_header_and_page_count() {
        let placements = vec![
            line(0, 700.0, "first"),
            line(1, 700.0, "second"),
            line(2, 700.0, "third"),
        ];
        let bytes = emit_pdf(&placements, 3, a4(), &helvetica()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(find(&bytes, b"/Count 3").is_some());
        assert_eq!(count_pages(&bytes), 3);
    }

    #[test]
    fn test_draw_order_follows_record_order() {
        let placements = vec![line(0, 700.0, "first"), line(0, 700.0, "second")];
        let bytes = emit_pdf(&placements, 1, a4(), &helvetica()).unwrap();
        let first = find(&bytes, b"(first)").expect("first string drawn");
        let second = find(&bytes, b"(second)").expect("second string drawn");
        assert!(first < second);
    }

    #[test]
    fn test_mincho_font_objects() {
        let placements = vec![Placement {
            page: 0,
            x: 500.0,
            y: 700.0,
            content: Content::Glyph('歌'),
        }];
        let bytes = emit_pdf(&placements, 1, a4(), &PdfOptions::default()).unwrap();
        assert!(find(&bytes, b"/BaseFont /HeiseiMin-W3").is_some());
        assert!(find(&bytes, b"/Encoding /UniJIS-UCS2-H").is_some());
        assert!(find(&bytes, b"/Ordering (Japan1)").is_some());
    }

    #[test]
    fn test_title_is_written_to_info() {
        let options = PdfOptions {
            title: Some("spring".to_string()),
            ..helvetica()
        };
        let bytes = emit_pdf(&[], 1, a4(), &options).unwrap();
        assert!(find(&bytes, b"/Title (spring)").is_some());
        assert_eq!(count_pages(&bytes), 1);
    }
}
