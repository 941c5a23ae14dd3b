use crate::colors::to_hex;
use crate::error::BadgeError;
use crate::surface::{DrawingSurface, Font};
use crate::text_metrics::{
    SYSTEM_FONTS, estimate_text_width, measure_text_width, sans_serif_family,
};
use resvg::tiny_skia::{
    Color, FillRule, FilterQuality, Paint, Path, Pixmap, PixmapPaint, Rect, Transform,
};
use std::sync::Arc;

/// Raster drawing surface backed by a `tiny_skia` pixmap.
pub struct Canvas {
    pixmap: Pixmap,
    fill: Color,
    alpha: f32,
    font: Font,
    text_options: usvg::Options<'static>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, BadgeError> {
        let pixmap = Pixmap::new(width, height).ok_or(BadgeError::Canvas { width, height })?;
        let mut text_options = usvg::Options::default();
        text_options.fontdb = Arc::clone(&SYSTEM_FONTS);
        text_options.font_family = sans_serif_family();
        Ok(Self {
            pixmap,
            fill: Color::BLACK,
            alpha: 1.0,
            font: Font::default(),
            text_options,
        })
    }

    /// Fill the whole canvas, ignoring the global alpha.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, String> {
        self.pixmap.encode_png().map_err(|err| err.to_string())
    }

    fn paint(&self) -> Paint<'static> {
        let mut color = self.fill;
        color.apply_opacity(self.alpha);
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        paint
    }

    fn text_svg(&self, text: &str, x: f32, y: f32) -> String {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let weight = if self.font.bold { "bold" } else { "normal" };
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{weight}\" fill=\"{}\" fill-opacity=\"{}\" xml:space=\"preserve\">{}</text></svg>",
            escape_xml(&self.font.family),
            self.font.size,
            to_hex(self.fill),
            self.fill.alpha() * self.alpha,
            escape_xml(text)
        )
    }
}

impl DrawingSurface for Canvas {
    fn set_fill_style(&mut self, color: Color) {
        self.fill = color;
    }

    fn fill_style(&self) -> Color {
        self.fill
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn global_alpha(&self) -> f32 {
        self.alpha
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn fill_path(&mut self, path: &Path) {
        let paint = self.paint();
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = self.paint();
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        measure_text_width(text, self.font.size, &self.font.family, self.font.bold)
            .unwrap_or_else(|| estimate_text_width(text, self.font.size))
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let svg = self.text_svg(text, x, y);
        match usvg::Tree::from_str(&svg, &self.text_options) {
            Ok(tree) => {
                resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());
            }
            Err(err) => log::warn!("skipping label text: {err}"),
        }
    }

    fn draw_image(&mut self, image: &Pixmap, x: f32, y: f32, width: f32, height: f32) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let sx = width / image.width() as f32;
        let sy = height / image.height() as f32;
        let paint = PixmapPaint {
            opacity: self.alpha,
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, x, y),
            None,
        );
    }
}

/// Escape markup characters and drop characters XML 1.0 does not allow.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .chars()
        .filter(|ch| is_xml_char(*ch))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::PathBuilder;

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = canvas
            .pixmap()
            .pixel(x, y)
            .expect("pixel in bounds")
            .demultiply();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(BadgeError::Canvas { width: 0, height: 10 })
        ));
    }

    #[test]
    fn fills_circle_with_current_style() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.set_fill_style(Color::from_rgba8(255, 0, 0, 255));
        let circle = PathBuilder::from_circle(10.0, 10.0, 8.0).unwrap();
        canvas.fill_path(&circle);
        assert_eq!(pixel(&canvas, 10, 10), (255, 0, 0, 255));
        assert_eq!(pixel(&canvas, 0, 0).3, 0);
    }

    #[test]
    fn global_alpha_blends_rectangles() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.clear(Color::WHITE);
        canvas.set_fill_style(Color::BLACK);
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0);
        let (r, g, b, a) = pixel(&canvas, 1, 1);
        assert_eq!(a, 255);
        assert!((120..=135).contains(&r), "got {r}");
        assert_eq!((r, g), (g, b));
    }

    #[test]
    fn draw_image_scales_into_box() {
        let mut icon = Pixmap::new(2, 2).unwrap();
        icon.fill(Color::from_rgba8(0, 0, 255, 255));
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.draw_image(&icon, 2.0, 2.0, 6.0, 6.0);
        let (r, _, b, a) = pixel(&canvas, 5, 5);
        assert!(r < 5 && b > 250 && a > 250, "got {:?}", (r, b, a));
        assert_eq!(pixel(&canvas, 0, 0).3, 0);
        assert_eq!(pixel(&canvas, 9, 9).3, 0);
    }

    #[test]
    fn text_markup_is_escaped() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_font(Font::bold("Arial", 8.0));
        let svg = canvas.text_svg("a<b & \"c\"", 1.0, 9.0);
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("fill=\"#000000\""));
    }

    #[test]
    fn control_characters_are_dropped_from_text() {
        let canvas = Canvas::new(10, 10).unwrap();
        let svg = canvas.text_svg("A\u{8}B\u{0}", 1.0, 9.0);
        assert!(svg.contains(">AB</text>"));
        assert!(usvg::Tree::from_str(&svg, &canvas.text_options).is_ok());
        assert_eq!(escape_xml("tab\there"), "tab\there");
    }

    #[test]
    fn generic_font_inks_pixels() {
        if SYSTEM_FONTS.is_empty() {
            return;
        }
        let mut canvas = Canvas::new(80, 40).unwrap();
        canvas.set_fill_style(Color::BLACK);
        canvas.set_font(Font::bold("sans-serif", 32.0));
        canvas.fill_text("AB", 4.0, 34.0);
        let inked = canvas
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0)
            .count();
        assert!(inked > 0, "no text pixels drawn");
    }
}
