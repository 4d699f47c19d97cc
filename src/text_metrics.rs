use crate::error::LayoutError;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Rendered-width oracle for label text. Layout depends only on this
/// trait, so tests and benchmarks can swap in a deterministic stand-in
/// for the system font machinery.
pub trait MeasureText {
    fn text_width(&self, text: &str, font_size: f32, font_family: &str)
    -> Result<f32, LayoutError>;
}

static FONT_STORE: Lazy<Mutex<FontStore>> = Lazy::new(|| Mutex::new(FontStore::new()));

/// Measures with real font metrics: system fonts are located through
/// fontdb and glyph advances read with ttf-parser. Faces are cached per
/// family list for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFontMetrics;

impl MeasureText for SystemFontMetrics {
    fn text_width(
        &self,
        text: &str,
        font_size: f32,
        font_family: &str,
    ) -> Result<f32, LayoutError> {
        if text.is_empty() || font_size <= 0.0 {
            return Ok(0.0);
        }
        let mut store = FONT_STORE
            .lock()
            .map_err(|_| LayoutError::FontUnavailable(font_family.to_string()))?;
        store
            .measure(text, font_size, font_family)
            .ok_or_else(|| LayoutError::FontUnavailable(font_family.to_string()))
    }
}

/// Fixed-advance measurement: every glyph is `advance` times the font
/// size wide. Deterministic across machines, which is what tests and
/// benchmarks want.
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMetrics {
    pub advance: f32,
}

impl Default for CharWidthMetrics {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl MeasureText for CharWidthMetrics {
    fn text_width(
        &self,
        text: &str,
        font_size: f32,
        font_family: &str,
    ) -> Result<f32, LayoutError> {
        let _ = font_family;
        let count = text.chars().filter(|c| *c != '\n').count();
        Ok(count as f32 * self.advance * font_size)
    }
}

struct FontStore {
    db: Database,
    system_fonts_loaded: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl FontStore {
    fn new() -> Self {
        Self {
            db: Database::new(),
            system_fonts_loaded: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        let normalized = text.replace('\t', "    ");
        Some(face.measure(&normalized, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        if !self.system_fonts_loaded {
            self.db.load_system_fonts();
            self.system_fonts_loaded = true;
        }

        // The family value is a CSS-style list; fontdb wants one query
        // with the candidates in preference order.
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let id = self.db.query(&Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;

        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            loaded = LoadedFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

/// A resolved font face plus advance caches. The raw bytes are kept so
/// uncached glyphs can be looked up lazily; the ASCII table covers the
/// common case without re-parsing.
struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    extended_advances: HashMap<char, Option<u16>>,
}

impl LoadedFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        drop(face);
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            extended_advances: HashMap::new(),
        })
    }

    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        // Glyphs the face does not cover still take up roughly this much.
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let units = if (ch as u32) < 128 {
                match self.ascii_advances[ch as usize] {
                    0 => None,
                    advance => Some(advance),
                }
            } else {
                self.advance_units(ch)
            };
            match units {
                Some(advance) => width += advance as f32 * scale,
                None => width += fallback,
            }
        }
        width.max(0.0)
    }

    fn advance_units(&mut self, ch: char) -> Option<u16> {
        if let Some(cached) = self.extended_advances.get(&ch) {
            return *cached;
        }
        let units = Face::parse(&self.data, self.index).ok().and_then(|face| {
            face.glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
        });
        self.extended_advances.insert(ch, units);
        units
    }
}

fn family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_metrics_scale_with_font_size() {
        let metrics = CharWidthMetrics::default();
        let narrow = metrics.text_width("abc", 10.0, "any").unwrap();
        let wide = metrics.text_width("abc", 20.0, "any").unwrap();
        assert_eq!(wide, narrow * 2.0);
    }

    #[test]
    fn fixed_metrics_ignore_newlines() {
        let metrics = CharWidthMetrics::default();
        assert_eq!(
            metrics.text_width("ab", 10.0, "any").unwrap(),
            metrics.text_width("a\nb", 10.0, "any").unwrap()
        );
    }

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(SystemFontMetrics.text_width("", 13.0, "serif").unwrap(), 0.0);
        assert_eq!(
            CharWidthMetrics::default()
                .text_width("", 13.0, "serif")
                .unwrap(),
            0.0
        );
    }
}
