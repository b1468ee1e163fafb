use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of `text` in px using a system font matching `font_family`.
/// Returns `None` when no usable face is installed.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Label width with the per-character estimate as a fallback.
pub fn label_width(text: &str, font_size: f32, font_family: &str, fast: bool) -> f32 {
    if fast {
        return fallback_text_width(text, font_size);
    }
    measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

pub fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Advance width in em for a character when no font is available.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.26,
        'f' | 'r' | 't' | '(' | ')' | '[' | ']' => 0.35,
        'm' | 'w' | 'M' | 'W' => 0.88,
        '@' | '#' | '%' | '&' => 0.946,
        'A'..='Z' => 0.66,
        c if c.is_ascii() => 0.56,
        // CJK ideographs, kana, hangul, fullwidth forms and emoji render square.
        '\u{2E80}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FFEF}'
        | '\u{1F000}'..='\u{1FAFF}' => 1.0,
        _ => 0.6,
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            if face.is_none() {
                log::debug!("no system font for \"{key}\", using estimated label widths");
            }
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
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
            .with_face_data(id, |data, index| FontFace::new(data.to_vec(), index))
            .flatten()
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    /// Advance in font units per character; `None` for characters without a glyph.
    advances: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn new(data: Vec<u8>, index: u32) -> Option<Self> {
        let units_per_em = Face::parse(&data, index).ok()?.units_per_em().max(1) as f32;
        Some(Self {
            data,
            index,
            units_per_em,
            advances: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let missing: Vec<char> = text
            .chars()
            .filter(|ch| !self.advances.contains_key(ch))
            .collect();
        if !missing.is_empty() {
            let face = Face::parse(&self.data, self.index).ok()?;
            for ch in missing {
                let advance = face
                    .glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph));
                self.advances.insert(ch, advance);
            }
        }

        let scale = font_size / self.units_per_em;
        let width = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| match self.advances.get(&ch).copied().flatten() {
                Some(advance) if advance > 0 => advance as f32 * scale,
                _ => char_width_factor(ch) * font_size,
            })
            .sum::<f32>();
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
