use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Horizontal and vertical extent of a single line of text.
///
/// `ascent` is the signed offset of the top of the line from the baseline and
/// is negative (y grows downward); `descent` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    pub fn height(&self) -> f32 {
        self.descent - self.ascent
    }
}

/// Text measurement supplied by the host.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;

    /// Font-level `(ascent, descent)`, independent of the measured string.
    fn vertical_metrics(&self) -> (f32, f32);

    fn measure(&self, text: &str) -> TextMetrics {
        let (ascent, descent) = self.vertical_metrics();
        TextMetrics {
            width: self.text_width(text),
            ascent,
            descent,
        }
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str) -> f32 {
        (**self).text_width(text)
    }

    fn vertical_metrics(&self) -> (f32, f32) {
        (**self).vertical_metrics()
    }
}

const DEFAULT_ASCENT_EM: f32 = 0.93;
const DEFAULT_DESCENT_EM: f32 = 0.24;

/// Deterministic measurer that needs no font files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasurer {
    font_size: f32,
    ascent: f32,
    descent: f32,
    char_width: Option<f32>,
}

impl FixedMeasurer {
    /// Proportional widths from a calibrated sans-serif table.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            ascent: -DEFAULT_ASCENT_EM * font_size,
            descent: DEFAULT_DESCENT_EM * font_size,
            char_width: None,
        }
    }

    /// Every character advances by `char_width`.
    pub fn monospace(char_width: f32, ascent: f32, descent: f32) -> Self {
        Self {
            font_size: char_width,
            ascent: -ascent.abs(),
            descent: descent.abs(),
            char_width: Some(char_width),
        }
    }
}

impl TextMeasure for FixedMeasurer {
    fn text_width(&self, text: &str) -> f32 {
        match self.char_width {
            Some(width) => text.chars().count() as f32 * width,
            None => fallback_text_width(text, self.font_size),
        }
    }

    fn vertical_metrics(&self) -> (f32, f32) {
        (self.ascent, self.descent)
    }
}

/// Measures with a system font resolved through `fontdb`, falling back to the
/// fixed table when no face matches the family list.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMeasurer {
    font_family: String,
    font_size: f32,
}

impl FontMeasurer {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }
}

impl TextMeasure for FontMeasurer {
    fn text_width(&self, text: &str) -> f32 {
        if text.is_empty() || self.font_size <= 0.0 {
            return 0.0;
        }
        measure_text_width(text, self.font_size, &self.font_family)
            .unwrap_or_else(|| fallback_text_width(text, self.font_size))
    }

    fn vertical_metrics(&self) -> (f32, f32) {
        font_vertical_metrics(self.font_size, &self.font_family).unwrap_or((
            -DEFAULT_ASCENT_EM * self.font_size,
            DEFAULT_DESCENT_EM * self.font_size,
        ))
    }
}

static FONT_CACHE: Lazy<Mutex<FontCache>> = Lazy::new(|| Mutex::new(FontCache::new()));

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    let mut guard = FONT_CACHE.lock().ok()?;
    let face = guard.face(font_family)?;
    face.measure_width(text, font_size)
}

pub fn font_vertical_metrics(font_size: f32, font_family: &str) -> Option<(f32, f32)> {
    let mut guard = FONT_CACHE.lock().ok()?;
    let face = guard.face(font_family)?;
    let scale = font_size / face.units_per_em as f32;
    Some((
        -(face.ascender as f32 * scale).abs(),
        (face.descender as f32 * scale).abs(),
    ))
}

struct FontCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl FontCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn face(&mut self, font_family: &str) -> Option<&LoadedFace> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            if face.is_none() {
                tracing::warn!(family = %key, "no font face found, using fixed text metrics");
            }
            self.faces.insert(key.clone(), face);
        }
        self.faces.get(&key).and_then(|face| face.as_ref())
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(*name),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| LoadedFace::parse(data.to_vec(), index))
            .flatten()
    }
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    ascii_advances: [u16; 128],
}

impl LoadedFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        let units_per_em = face.units_per_em().max(1);
        let ascender = face.ascender();
        let descender = face.descender();
        Some(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let width: f32 = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| match self.ascii_advances[byte as usize] {
                    0 => fallback,
                    advance => advance as f32 * scale,
                })
                .sum();
            return Some(width.max(0.0));
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        let width: f32 = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(fallback)
            })
            .sum();
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

// Advance widths in em for a generic sans-serif face.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'A' | 'B' | 'K' | 'X' | 'Y' => 0.65,
        'C' | 'D' | 'G' | 'H' | 'N' | 'O' | 'Q' | 'U' => 0.745,
        'E' | 'F' | 'L' | 'P' | 'R' | 'S' | 'T' | 'Z' => 0.6,
        'I' => 0.272,
        'J' => 0.557,
        'M' => 0.903,
        'V' => 0.661,
        'W' => 0.958,
        'f' | 'r' | 't' => 0.34,
        'i' | 'j' | 'l' => 0.235,
        'm' => 0.867,
        'w' => 0.811,
        'a'..='z' => 0.57,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}
