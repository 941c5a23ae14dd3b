use crate::surface::DrawingSurface;
use resvg::tiny_skia::{Color, PathBuilder};

/// Ratio of circle diameter to canvas side.
pub const BADGE_SCALE: f32 = 0.85;

/// Circle placement shared by the icon and label renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeGeometry {
    pub circle_diameter: f32,
    pub circle_radius: f32,
    pub center_x: f32,
    /// Equal to the radius: the circle touches the top edge, leaving the
    /// bottom of the canvas for the label.
    pub center_y: f32,
}

impl BadgeGeometry {
    pub fn new(size: f32, scale: f32) -> Self {
        let circle_diameter = size * scale;
        let circle_radius = circle_diameter / 2.0;
        Self {
            circle_diameter,
            circle_radius,
            center_x: size / 2.0,
            center_y: circle_diameter / 2.0,
        }
    }
}

/// Fill the badge disc and return its geometry.
pub fn draw_background<S: DrawingSurface + ?Sized>(
    size: f32,
    scale: f32,
    color: Color,
    surface: &mut S,
) -> BadgeGeometry {
    let geometry = BadgeGeometry::new(size, scale);
    if let Some(circle) =
        PathBuilder::from_circle(geometry.center_x, geometry.center_y, geometry.circle_radius)
    {
        surface.set_fill_style(color);
        surface.fill_path(&circle);
    }
    geometry
}
