use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ttf_parser::Face;
use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

/// System fonts, loaded once and shared by measurement and text rendering so
/// both resolve a family to the same face.
pub(crate) static SYSTEM_FONTS: Lazy<Arc<Database>> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} system font faces", db.len());
    if let Some(family) = installed_sans_family(&db) {
        log::debug!("generic sans-serif resolves to {family}");
        db.set_sans_serif_family(family);
    }
    Arc::new(db)
});

/// Families tried, in order, for the generic `sans-serif` family.
const SANS_CANDIDATES: [&str; 8] = [
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "FreeSans",
    "Verdana",
];

/// Family actually installed that should stand in for `sans-serif`.
///
/// fontdb maps the generic families to fixed names ("Arial" for sans-serif),
/// which leaves text unrenderable on hosts without that font. Falls back to
/// the first proportional face, then to any face at all.
fn installed_sans_family(db: &Database) -> Option<String> {
    let has_family = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family.eq_ignore_ascii_case(name)))
    };
    if let Some(name) = SANS_CANDIDATES.iter().find(|name| has_family(name)) {
        return Some((*name).to_string());
    }
    let first_family = |monospaced_ok: bool| {
        db.faces()
            .filter(|face| monospaced_ok || !face.monospaced)
            .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
    };
    first_family(false).or_else(|| first_family(true))
}

/// Family name the shared database uses for generic `sans-serif`.
pub(crate) fn sans_serif_family() -> String {
    SYSTEM_FONTS.family_name(&Family::SansSerif).to_string()
}

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Advance width per character used when no font face can be resolved.
const FALLBACK_ADVANCE: f32 = 0.56;

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str, bold: bool) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family, bold)
}

/// Width estimate that does not consult any font.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|ch| *ch != '\n').count() as f32 * font_size * FALLBACK_ADVANCE
}

struct TextMeasurer {
    cache: HashMap<(String, bool), Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str, bold: bool) -> Option<f32> {
        let key = (normalize_family_key(font_family), bold);
        let face = self
            .cache
            .entry(key)
            .or_insert_with(|| load_face(&SYSTEM_FONTS, font_family, bold))
            .as_mut()?;
        let normalized = text.replace('\t', "    ");
        face.measure_width(&normalized, font_size)
    }
}

fn load_face(db: &Database, font_family: &str, bold: bool) -> Option<FontFace> {
    let mut names: Vec<String> = Vec::new();
    let mut generics: Vec<(usize, Family<'static>)> = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        let position = names.len() + generics.len();
        match raw.to_ascii_lowercase().as_str() {
            "serif" => generics.push((position, Family::Serif)),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                generics.push((position, Family::SansSerif))
            }
            "monospace" | "ui-monospace" => generics.push((position, Family::Monospace)),
            "cursive" => generics.push((position, Family::Cursive)),
            "fantasy" => generics.push((position, Family::Fantasy)),
            _ => names.push(raw.to_string()),
        }
    }

    // Rebuild the declared order, interleaving generic families with names.
    let total = names.len() + generics.len();
    let mut families: Vec<Family<'_>> = Vec::with_capacity(total.max(1));
    let mut named = names.iter();
    let mut generic = generics.iter().peekable();
    for position in 0..total {
        match generic.peek() {
            Some((at, family)) if *at == position => {
                families.push(*family);
                generic.next();
            }
            _ => {
                if let Some(name) = named.next() {
                    families.push(Family::Name(name.as_str()));
                }
            }
        }
    }
    if families.is_empty() {
        families.push(Family::SansSerif);
    }

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| {
        let face = Face::parse(data, index).ok()?;
        Some(FontFace::new(data.to_vec(), index, face.units_per_em().max(1)))
    })?
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    advances: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn new(data: Vec<u8>, index: u32, units_per_em: u16) -> Self {
        Self {
            data,
            index,
            units_per_em,
            advances: HashMap::new(),
        }
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let face = Face::parse(&self.data, self.index).ok()?;
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_ADVANCE;
        let mut width = 0.0f32;

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = *self.advances.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            match advance {
                Some(advance) if advance > 0 => width += advance as f32 * scale,
                _ => width += fallback,
            }
        }

        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}
