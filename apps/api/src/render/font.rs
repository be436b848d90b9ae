//! Font selection for PDF output.
//!
//! Fonts are referenced by name and never embedded; the viewer supplies the glyphs.
//! The chosen font decides how text is encoded into content-stream strings.

use std::str::FromStr;

/// Replacement for characters the Mincho CMap cannot address (outside the BMP).
const GETA_MARK: char = '\u{3013}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontConfig {
    /// Adobe-Japan1 CID font `HeiseiMin-W3` through the `UniJIS-UCS2-H` CMap.
    #[default]
    Mincho,
    /// Standard Type1 Helvetica with WinAnsi encoding. Latin-1 only.
    Helvetica,
}

impl FontConfig {
    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontConfig::Mincho => b"HeiseiMin-W3",
            FontConfig::Helvetica => b"Helvetica",
        }
    }

    /// Encodes `text` as the byte string shown with this font.
    ///
    /// Mincho: UTF-16BE code units; characters outside the BMP become `〓`.
    /// Helvetica: one byte per character; anything outside Latin-1 becomes `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            FontConfig::Mincho => text
                .chars()
                .map(|c| if (c as u32) > 0xFFFF { GETA_MARK } else { c })
                .flat_map(|c| (c as u16).to_be_bytes())
                .collect(),
            FontConfig::Helvetica => text
                .chars()
                .map(|c| match c as u32 {
                    code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
                    _ => b'?',
                })
                .collect(),
        }
    }
}

impl FromStr for FontConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mincho" | "heiseimin-w3" => Ok(FontConfig::Mincho),
            "helvetica" => Ok(FontConfig::Helvetica),
            other => Err(format!(
                "unknown PDF font '{other}' (expected 'mincho' or 'helvetica')"
            )),
        }
    }
}
