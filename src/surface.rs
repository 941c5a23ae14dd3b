//! Canvas-style drawing surface used by the badge renderers.
//!
//! The renderers only talk to [`DrawingSurface`], which mirrors the stateful
//! 2D-context model: a current fill style, a global alpha and a font apply to
//! every subsequent fill. [`crate::canvas::Canvas`] draws into pixels,
//! [`RecordingSurface`] records the calls.

use resvg::tiny_skia::{Color, Path, Pixmap};

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub fn bold(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: true,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 10.0,
            bold: false,
        }
    }
}

pub trait DrawingSurface {
    fn set_fill_style(&mut self, color: Color);
    fn fill_style(&self) -> Color;
    fn set_global_alpha(&mut self, alpha: f32);
    fn global_alpha(&self) -> f32;
    fn set_font(&mut self, font: Font);

    fn fill_path(&mut self, path: &Path);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f32;
    /// Draw `text` with its left edge at `x` and alphabetic baseline at `y`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// Composite `image` scaled into the `width` x `height` box at (`x`, `y`).
    fn draw_image(&mut self, image: &Pixmap, x: f32, y: f32, width: f32, height: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillPath {
        bounds: (f32, f32, f32, f32),
        fill: Color,
        alpha: f32,
    },
    FillRect {
        rect: (f32, f32, f32, f32),
        fill: Color,
        alpha: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        font: Font,
        fill: Color,
        alpha: f32,
    },
    DrawImage {
        image_size: (u32, u32),
        rect: (f32, f32, f32, f32),
        alpha: f32,
    },
}

/// Records draw calls instead of rasterizing them. Text measures as a fixed width.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    fill: Color,
    alpha: f32,
    font: Font,
    text_width: f32,
    pub ops: Vec<DrawOp>,
    pub measured: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            fill: Color::BLACK,
            alpha: 1.0,
            font: Font::default(),
            text_width: 0.0,
            ops: Vec::new(),
            measured: Vec::new(),
        }
    }

    /// Width returned by every `measure_text` call.
    pub fn with_text_width(mut self, width: f32) -> Self {
        self.text_width = width;
        self
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillText { .. }))
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::DrawImage { .. }))
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for RecordingSurface {
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
        let b = path.bounds();
        self.ops.push(DrawOp::FillPath {
            bounds: (b.x(), b.y(), b.width(), b.height()),
            fill: self.fill,
            alpha: self.alpha,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::FillRect {
            rect: (x, y, width, height),
            fill: self.fill,
            alpha: self.alpha,
        });
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        self.measured.push(text.to_string());
        self.text_width
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
            fill: self.fill,
            alpha: self.alpha,
        });
    }

    fn draw_image(&mut self, image: &Pixmap, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::DrawImage {
            image_size: (image.width(), image.height()),
            rect: (x, y, width, height),
            alpha: self.alpha,
        });
    }
}
