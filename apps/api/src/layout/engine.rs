//! Pagination and glyph placement.
//!
//! # Architecture
//! - `layout` dispatches on [`DirectionMode`] to one of the two flow algorithms.
//! - `layout_vertical` places one glyph per row, columns advancing right to left.
//! - `layout_horizontal` places one entry per line, lines advancing downward.
//!
//! Both are pure: the same entries, geometry and spacing always produce the same
//! placement sequence. Page indices never decrease along the sequence, so the
//! emitter can draw it in a single pass.
//!
//! # Overflow policy
//! A slot fits while its coordinate is `>=` the margin threshold (strict `<` breaks).
//! Breaks are taken lazily, right before the next unit is placed, so a layout never
//! ends on a trailing blank page.
//! - Vertical row overflow: new page, same column, back to the top row.
//! - Vertical column overflow: new page, rightmost column.
//! - Horizontal line overflow: new page, top line.

use serde::Serialize;
use thiserror::Error;

use crate::layout::geometry::{DirectionMode, LayoutParams, PageGeometry};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// The unit drawn by a single placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Content {
    /// One character of a vertically flowed entry.
    Glyph(char),
    /// A whole entry on one horizontal line.
    Line(String),
}

/// One drawing instruction: put `content` with its baseline origin at `(x, y)` on `page`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub content: Content,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// `max(page) + 1` over all placements; 1 when nothing was placed.
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

impl Layout {
    fn from_placements(placements: Vec<Placement>) -> Self {
        // Non-decreasing pages: the last placement carries the highest index.
        let page_count = placements.last().map_or(1, |p| p.page + 1);
        Layout {
            page_count,
            placements,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{name} must be a positive, finite length (got {value})")]
    InvalidSpacing { name: &'static str, value: f32 },

    #[error("page geometry leaves no room for a single {0}")]
    NoPrintableArea(&'static str),
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `entries` in `mode` on pages of `geometry`, using the spacing from `params`.
pub fn layout<S: AsRef<str>>(
    entries: &[S],
    geometry: &PageGeometry,
    mode: DirectionMode,
    params: &LayoutParams,
) -> Result<Layout, LayoutError> {
    match mode {
        DirectionMode::Vertical => layout_vertical(
            entries,
            geometry,
            params.vertical.column_spacing,
            params.vertical.row_spacing,
        ),
        DirectionMode::Horizontal => {
            layout_horizontal(entries, geometry, params.horizontal.line_spacing)
        }
    }
}

/// Vertical writing: each entry gets its own column, one glyph per row.
///
/// An entry longer than a column continues on the next page in the same column.
/// An empty entry places nothing but still consumes a column.
pub fn layout_vertical<S: AsRef<str>>(
    entries: &[S],
    geometry: &PageGeometry,
    column_spacing: f32,
    row_spacing: f32,
) -> Result<Layout, LayoutError> {
    let rows = rows_per_column(geometry, row_spacing)?;
    let columns = columns_per_page(geometry, column_spacing)?;

    let top = geometry.top_line();
    let right = geometry.right_column();

    let mut placements = Vec::new();
    let mut page = 0usize;
    let mut column = 0usize;

    for entry in entries {
        if column == columns {
            page += 1;
            column = 0;
        }
        let x = right - column as f32 * column_spacing;

        let mut row = 0usize;
        for ch in entry.as_ref().chars() {
            if row == rows {
                page += 1;
                row = 0;
            }
            placements.push(Placement {
                page,
                x,
                y: top - row as f32 * row_spacing,
                content: Content::Glyph(ch),
            });
            row += 1;
        }

        column += 1;
    }

    Ok(Layout::from_placements(placements))
}

/// Horizontal writing: one entry per line at the left margin.
pub fn layout_horizontal<S: AsRef<str>>(
    entries: &[S],
    geometry: &PageGeometry,
    line_spacing: f32,
) -> Result<Layout, LayoutError> {
    let lines = lines_per_page(geometry, line_spacing)?;
    let top = geometry.top_line();
    let x = geometry.margins.left;

    let placements = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Placement {
            page: i / lines,
            x,
            y: top - (i % lines) as f32 * line_spacing,
            content: Content::Line(entry.as_ref().to_string()),
        })
        .collect();

    Ok(Layout::from_placements(placements))
}

// ────────────────────────────────────────────────────────────────────────────
// Capacity
// ────────────────────────────────────────────────────────────────────────────

/// Glyph rows that fit in one vertical column.
pub fn rows_per_column(geometry: &PageGeometry, row_spacing: f32) -> Result<usize, LayoutError> {
    check_spacing("row spacing", row_spacing)?;
    let rows = slots_down_to(geometry.top_line(), geometry.margins.bottom, row_spacing);
    if rows == 0 {
        return Err(LayoutError::NoPrintableArea("row"));
    }
    Ok(rows)
}

/// Vertical columns that fit on one page.
pub fn columns_per_page(
    geometry: &PageGeometry,
    column_spacing: f32,
) -> Result<usize, LayoutError> {
    check_spacing("column spacing", column_spacing)?;
    let columns = slots_down_to(geometry.right_column(), geometry.margins.left, column_spacing);
    if columns == 0 {
        return Err(LayoutError::NoPrintableArea("column"));
    }
    Ok(columns)
}

/// Horizontal lines that fit on one page.
pub fn lines_per_page(geometry: &PageGeometry, line_spacing: f32) -> Result<usize, LayoutError> {
    check_spacing("line spacing", line_spacing)?;
    let lines = slots_down_to(geometry.top_line(), geometry.margins.bottom, line_spacing);
    if lines == 0 {
        return Err(LayoutError::NoPrintableArea("line"));
    }
    Ok(lines)
}

/// Counts `k = 0, 1, ..` with `start - k * step >= limit`.
///
/// The estimate from the division is nudged with the same expression the flow
/// loops use for coordinates, so the capacity and the placed coordinates agree
/// exactly at the boundary.
fn slots_down_to(start: f32, limit: f32, step: f32) -> usize {
    let fits = |k: usize| start - k as f32 * step >= limit;
    if !start.is_finite() || !limit.is_finite() || !fits(0) {
        return 0;
    }
    // Saturates for tiny steps.
    let mut count = (((start - limit) / step).floor() as usize).saturating_add(1);
    for _ in 0..2 {
        if count > 1 && !fits(count - 1) {
            count -= 1;
        }
    }
    for _ in 0..2 {
        if fits(count) {
            count = count.saturating_add(1);
        }
    }
    count
}

fn check_spacing(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidSpacing { name, value })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
