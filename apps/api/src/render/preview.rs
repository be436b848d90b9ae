//! HTML preview of a collection.
//!
//! Produces a self-contained fragment (style block + one block per entry) in the
//! same writing direction the PDF would use, and in the same order.

use std::fmt::Write as _;

use crate::layout::geometry::DirectionMode;

const VERTICAL_STYLE: &str = r#"<style>
.vertical-text {
    writing-mode: vertical-rl;
    text-orientation: upright;
    font-size: 1.2rem;
    line-height: 2;
    white-space: pre-wrap;
    border: 1px solid #ddd;
    border-radius: 10px;
    padding: 10px;
    background-color: #fafafa;
    display: inline-block;
    margin: 10px;
}
</style>"#;

const HORIZONTAL_STYLE: &str = r#"<style>
.horizontal-text {
    font-size: 1.1rem;
    line-height: 1.6;
    border-bottom: 1px dotted #ccc;
    padding: 6px;
}
</style>"#;

const EMPTY_NOTICE: &str = r#"<div class="empty-collection">No poems have been submitted yet.</div>"#;

/// Renders `entries` as styled blocks for `mode`.
///
/// An empty list renders an empty-collection notice rather than an empty page.
pub fn render_preview<S: AsRef<str>>(entries: &[S], mode: DirectionMode) -> String {
    if entries.is_empty() {
        return EMPTY_NOTICE.to_string();
    }

    let (style, class) = match mode {
        DirectionMode::Vertical => (VERTICAL_STYLE, "vertical-text"),
        DirectionMode::Horizontal => (HORIZONTAL_STYLE, "horizontal-text"),
    };

    let mut html = String::with_capacity(style.len() + entries.len() * 96);
    html.push_str(style);
    html.push('\n');
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(
            html,
            r#"<div class="{class}">🌸 {}</div>"#,
            escape_html(entry.as_ref())
        );
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
