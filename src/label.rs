use crate::surface::{DrawingSurface, Font};
use crate::theme::Theme;
use resvg::tiny_skia::{Color, Path, PathBuilder};

/// Box placement for the text label, derived from the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl LabelBox {
    /// The box spans 80% of the canvas and overlaps the lower 30% of its own
    /// height onto the circle.
    pub fn new(size: f32, circle_diameter: f32) -> Self {
        let width = size * 0.8;
        let height = size * 0.2;
        Self {
            x: (size - width) / 2.0,
            y: circle_diameter - height * 0.3,
            width,
            height,
            corner_radius: height * 0.3,
        }
    }

    pub fn font_size(&self) -> f32 {
        self.height * 0.8
    }

    pub fn baseline(&self) -> f32 {
        self.y + self.height * 0.8
    }

    /// Rounded rectangle with quadratic corners.
    pub fn path(&self) -> Option<Path> {
        let (x, y, w, h, r) = (self.x, self.y, self.width, self.height, self.corner_radius);
        let mut pb = PathBuilder::new();
        pb.move_to(x + r, y);
        pb.line_to(x + w - r, y);
        pb.quad_to(x + w, y, x + w, y + r);
        pb.line_to(x + w, y + h - r);
        pb.quad_to(x + w, y + h, x + w - r, y + h);
        pb.line_to(x + r, y + h);
        pb.quad_to(x, y + h, x, y + h - r);
        pb.line_to(x, y + r);
        pb.quad_to(x, y, x + r, y);
        pb.close();
        pb.finish()
    }
}

pub fn draw_label<S: DrawingSurface + ?Sized>(
    size: f32,
    circle_diameter: f32,
    surface: &mut S,
    text: &str,
    color: Color,
    theme: &Theme,
) -> LabelBox {
    let label = LabelBox::new(size, circle_diameter);

    if let Some(path) = label.path() {
        surface.set_fill_style(parse_or(&theme.label_fill, Color::WHITE));
        surface.fill_path(&path);
    }

    surface.set_font(Font::bold(theme.font_family.clone(), label.font_size()));
    let text_width = surface.measure_text(text);
    let text_x = label.x + (label.width - text_width) / 2.0;
    surface.set_fill_style(color);
    surface.fill_text(text, text_x, label.baseline());

    surface.set_fill_style(parse_or(&theme.shadow_color, Color::BLACK));
    surface.set_global_alpha(theme.shadow_alpha);
    surface.fill_rect(label.x, label.y, label.width, label.height);
    surface.set_global_alpha(1.0);

    label
}

fn parse_or(value: &str, fallback: Color) -> Color {
    crate::colors::parse_hex(value).unwrap_or_else(|| {
        log::warn!("unrecognized theme color '{value}', using default");
        fallback
    })
}
