//! Page geometry, writing direction and per-mode spacing parameters.
//!
//! All lengths are PDF points (1/72 inch). Use [`mm`] to convert from millimetres.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Units
// ────────────────────────────────────────────────────────────────────────────

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Converts millimetres to points.
pub fn mm(value: f32) -> f32 {
    value * MM
}

/// A4 short edge in points.
pub const A4_SHORT_EDGE: f32 = 210.0 * MM;
/// A4 long edge in points.
pub const A4_LONG_EDGE: f32 = 297.0 * MM;

// ────────────────────────────────────────────────────────────────────────────
// Direction and orientation
// ────────────────────────────────────────────────────────────────────────────

/// Writing direction shared by the preview and the PDF layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionMode {
    /// Top-to-bottom columns, advancing right to left. One glyph per row.
    #[default]
    Vertical,
    /// Left-to-right lines, advancing top to bottom. One entry per line.
    Horizontal,
}

impl DirectionMode {
    /// The page orientation used when the caller does not pick one.
    pub fn default_orientation(self) -> PageOrientation {
        match self {
            DirectionMode::Vertical => PageOrientation::Portrait,
            DirectionMode::Horizontal => PageOrientation::Landscape,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectionMode::Vertical => "vertical",
            DirectionMode::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for DirectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(DirectionMode::Vertical),
            "horizontal" => Ok(DirectionMode::Horizontal),
            other => Err(format!(
                "unknown direction mode '{other}' (expected 'vertical' or 'horizontal')"
            )),
        }
    }
}

/// Paper orientation. The paper itself is always A4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// `(width, height)` of an A4 sheet in this orientation.
    pub fn a4_size(self) -> (f32, f32) {
        match self {
            PageOrientation::Portrait => (A4_SHORT_EDGE, A4_LONG_EDGE),
            PageOrientation::Landscape => (A4_LONG_EDGE, A4_SHORT_EDGE),
        }
    }
}

impl FromStr for PageOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(PageOrientation::Portrait),
            "landscape" => Ok(PageOrientation::Landscape),
            other => Err(format!(
                "unknown page orientation '{other}' (expected 'portrait' or 'landscape')"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Margins {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

/// Physical page plus its printable margins.
///
/// PDF user space: origin at the bottom-left corner, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margins: Margins) -> Self {
        PageGeometry {
            width,
            height,
            margins,
        }
    }

    /// A4 in the given orientation with the given margins.
    pub fn a4(orientation: PageOrientation, margins: Margins) -> Self {
        let (width, height) = orientation.a4_size();
        PageGeometry::new(width, height, margins)
    }

    /// Baseline of the first row/line on every page.
    pub fn top_line(&self) -> f32 {
        self.height - self.margins.top
    }

    /// x of the rightmost vertical column.
    pub fn right_column(&self) -> f32 {
        self.width - self.margins.right
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout parameters
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalParams {
    /// Distance between two entries' columns.
    pub column_spacing: f32,
    /// Distance between two glyphs in one column.
    pub row_spacing: f32,
    pub margins: Margins,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalParams {
    /// Distance between two entries' baselines.
    pub line_spacing: f32,
    pub margins: Margins,
}

/// Spacing constants for both modes. Configuration, never derived from content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub vertical: VerticalParams,
    pub horizontal: HorizontalParams,
    pub font_size_pt: f32,
}

impl Default for LayoutParams {
    /// 14pt glyphs; vertical columns 25mm apart with 7mm rows inside 30mm margins;
    /// horizontal lines 12mm apart, stopping 20mm above the bottom edge.
    fn default() -> Self {
        LayoutParams {
            vertical: VerticalParams {
                column_spacing: mm(25.0),
                row_spacing: mm(7.0),
                margins: Margins::uniform(mm(30.0)),
            },
            horizontal: HorizontalParams {
                line_spacing: mm(12.0),
                margins: Margins {
                    top: mm(30.0),
                    bottom: mm(20.0),
                    left: mm(30.0),
                    right: mm(30.0),
                },
            },
            font_size_pt: 14.0,
        }
    }
}

impl LayoutParams {
    pub fn margins_for(&self, mode: DirectionMode) -> Margins {
        match mode {
            DirectionMode::Vertical => self.vertical.margins,
            DirectionMode::Horizontal => self.horizontal.margins,
        }
    }

    /// A4 geometry for `mode`, in `orientation` or the mode's default orientation.
    pub fn geometry_for(
        &self,
        mode: DirectionMode,
        orientation: Option<PageOrientation>,
    ) -> PageGeometry {
        let orientation = orientation.unwrap_or_else(|| mode.default_orientation());
        PageGeometry::a4(orientation, self.margins_for(mode))
    }
}
