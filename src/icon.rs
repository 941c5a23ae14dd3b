//! SVG icon rendering.
//!
//! An icon goes through a fixed pipeline before it touches the badge:
//! read the markup, rewrite it so its coordinate system matches the target
//! size, rasterize it onto a temporary bitmap, round-trip that bitmap through
//! PNG, and finally composite the decoded bitmap centered on the circle. Each
//! stage consumes the previous stage's output, so the call has finished
//! drawing by the time it returns.

use crate::background::BadgeGeometry;
use crate::canvas::escape_xml;
use crate::error::{BadgeError, IconError};
use crate::icons::IconSource;
use crate::surface::DrawingSurface;
use crate::text_metrics::SYSTEM_FONTS;
use resvg::tiny_skia::{Pixmap, Transform};
use std::sync::Arc;

/// Ratio of icon size to circle diameter.
pub const ICON_SCALE: f32 = 0.85;

const DEFAULT_DIMENSION: &str = "24";
const DEFAULT_VIEW_BOX: &str = "0 0 24 24";
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Root attributes that the rescaled document sets itself.
const MANAGED_ATTRIBUTES: [&str; 3] = ["viewBox", "width", "height"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledSvg {
    pub markup: String,
    pub icon_size: f32,
    pub scale: f32,
}

/// Load `name`, rescale and rasterize it, and draw it centered on the circle.
pub fn draw_icon<S: DrawingSurface + ?Sized>(
    icons: &dyn IconSource,
    name: &str,
    geometry: &BadgeGeometry,
    surface: &mut S,
) -> Result<(), BadgeError> {
    let icon_size = geometry.circle_diameter * ICON_SCALE;
    let bitmap = load_icon_bitmap(icons, name, icon_size).map_err(|err| {
        log::error!("error loading SVG icon {name}: {err}");
        BadgeError::icon_load(name, err)
    })?;

    let x = geometry.center_x - icon_size / 2.0;
    let y = geometry.center_y - icon_size / 2.0;
    surface.draw_image(&bitmap, x, y, icon_size, icon_size);
    log::debug!("drew icon {name} at ({x:.2}, {y:.2}) size {icon_size:.2}");
    Ok(())
}

fn load_icon_bitmap(icons: &dyn IconSource, name: &str, icon_size: f32) -> Result<Pixmap, IconError> {
    let source = icons.load_svg(name)?;
    let scaled = rescale_svg(&source, icon_size)?;
    let png = render_intermediate(&scaled)?;
    decode_bitmap(&png)
}

/// Rewrite `source` so it renders at `icon_size` x `icon_size` without distortion.
pub fn rescale_svg(source: &str, icon_size: f32) -> Result<ScaledSvg, IconError> {
    let doc = roxmltree::Document::parse(source)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(IconError::NotSvg(root.tag_name().name().to_string()));
    }

    let width = parse_dimension("width", root.attribute("width").unwrap_or(DEFAULT_DIMENSION))?;
    let height = parse_dimension("height", root.attribute("height").unwrap_or(DEFAULT_DIMENSION))?;
    let scale = (icon_size / width).min(icon_size / height);

    let view_box = root.attribute("viewBox").unwrap_or(DEFAULT_VIEW_BOX);
    let [vx, vy, vw, vh] = parse_view_box(view_box)?;

    let mut extra = String::new();
    for ns in root.namespaces() {
        match ns.name() {
            Some(prefix) if prefix != "xml" => {
                extra.push_str(&format!(" xmlns:{prefix}=\"{}\"", escape_xml(ns.uri())));
            }
            _ => {}
        }
    }
    for attr in root.attributes() {
        let qualified = match attr.namespace() {
            None if MANAGED_ATTRIBUTES.contains(&attr.name()) => continue,
            None => attr.name().to_string(),
            Some(XML_NS) => format!("xml:{}", attr.name()),
            Some(uri) => match root.lookup_prefix(uri) {
                Some(prefix) => format!("{prefix}:{}", attr.name()),
                None => continue,
            },
        };
        extra.push_str(&format!(" {qualified}=\"{}\"", escape_xml(attr.value())));
    }

    let inner = match (root.first_child(), root.last_child()) {
        (Some(first), Some(last)) => source[first.range().start..last.range().end].trim(),
        _ => "",
    };

    let markup = format!(
        "<svg xmlns=\"{SVG_NS}\" viewBox=\"{vx} {vy} {} {}\" width=\"{icon_size}\" height=\"{icon_size}\"{extra}><g transform=\"scale({scale})\">{inner}</g></svg>",
        vw * scale,
        vh * scale,
    );

    Ok(ScaledSvg {
        markup,
        icon_size,
        scale,
    })
}

/// Rasterize the rescaled icon at its natural size and encode the result as PNG.
pub fn render_intermediate(svg: &ScaledSvg) -> Result<Vec<u8>, IconError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(&SYSTEM_FONTS);
    let tree = usvg::Tree::from_str(&svg.markup, &opt)?;

    let side = svg.icon_size.ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(side, side)
        .ok_or_else(|| IconError::Raster(format!("cannot allocate {side}x{side} bitmap")))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| IconError::Raster(err.to_string()))
}

pub fn decode_bitmap(png: &[u8]) -> Result<Pixmap, IconError> {
    Pixmap::decode_png(png).map_err(|err| IconError::Raster(err.to_string()))
}

/// Leading-number parse of a length attribute: `"24px"` reads as 24.
fn parse_dimension(attribute: &'static str, value: &str) -> Result<f32, IconError> {
    let invalid = || IconError::Dimension {
        attribute,
        value: value.to_string(),
    };
    let number = leading_number(value).ok_or_else(invalid)?;
    if number.is_finite() && number > 0.0 {
        Ok(number)
    } else {
        Err(invalid())
    }
}

fn leading_number(value: &str) -> Option<f32> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(trimmed.len());
    (1..=end).rev().find_map(|len| trimmed[..len].parse::<f32>().ok())
}

fn parse_view_box(value: &str) -> Result<[f32; 4], IconError> {
    let numbers: Vec<f32> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f32>)
        .collect::<Result<_, _>>()
        .map_err(|_| IconError::ViewBox(value.to_string()))?;
    match numbers.as_slice() {
        [x, y, w, h] if [*x, *y, *w, *h].iter().all(|v| v.is_finite()) => Ok([*x, *y, *w, *h]),
        _ => Err(IconError::ViewBox(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{BADGE_SCALE, BadgeGeometry};
    use crate::surface::{DrawOp, RecordingSurface};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    const CIRCLE_ICON: &str = r##"
      <svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="#FFFFFF" stroke-width="2">
        <circle cx="12" cy="12" r="10" fill="#FFFFFF"/>
      </svg>
    "##;

    #[derive(Default)]
    struct MemoryIcons {
        files: HashMap<String, String>,
        reads: RefCell<Vec<String>>,
    }

    impl MemoryIcons {
        fn with(name: &str, svg: &str) -> Self {
            let mut icons = Self::default();
            icons.files.insert(name.to_string(), svg.to_string());
            icons
        }
    }

    impl IconSource for MemoryIcons {
        fn load_svg(&self, name: &str) -> io::Result<String> {
            self.reads.borrow_mut().push(name.to_string());
            self.files
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    fn attr(markup: &str, name: &str) -> String {
        let doc = roxmltree::Document::parse(markup).unwrap();
        doc.root_element().attribute(name).unwrap().to_string()
    }

    #[test]
    fn rescales_view_box_and_wraps_content() {
        let scaled = rescale_svg(CIRCLE_ICON, 120.0).unwrap();
        assert_eq!(scaled.scale, 5.0);
        assert_eq!(attr(&scaled.markup, "viewBox"), "0 0 120 120");
        assert_eq!(attr(&scaled.markup, "width"), "120");
        assert_eq!(attr(&scaled.markup, "height"), "120");
        assert_eq!(attr(&scaled.markup, "stroke"), "#FFFFFF");
        assert_eq!(attr(&scaled.markup, "stroke-width"), "2");
        assert!(scaled.markup.contains(r#"<g transform="scale(5)"><circle cx="12""#));
    }

    #[test]
    fn missing_attributes_use_defaults() {
        let scaled = rescale_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="24" height="24"/></svg>"#, 48.0)
            .unwrap();
        assert_eq!(scaled.scale, 2.0);
        assert_eq!(attr(&scaled.markup, "viewBox"), "0 0 48 48");
    }

    #[test]
    fn uses_smaller_axis_for_scale() {
        let scaled = rescale_svg(
            r#"<svg width="48px" height="24" viewBox="10 5 48 24"><path d="M0 0h1"/></svg>"#,
            96.0,
        )
        .unwrap();
        assert_eq!(scaled.scale, 2.0);
        assert_eq!(attr(&scaled.markup, "viewBox"), "10 5 96 48");
    }

    #[test]
    fn keeps_prefixed_namespaces() {
        let source = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="24" height="24"><defs><circle id="c" r="4"/></defs><use xlink:href="#c"/></svg>"##;
        let scaled = rescale_svg(source, 24.0).unwrap();
        assert!(scaled.markup.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        roxmltree::Document::parse(&scaled.markup).expect("rescaled markup stays well-formed");
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(rescale_svg("<svg", 10.0), Err(IconError::Xml(_))));
        assert!(matches!(rescale_svg("<html/>", 10.0), Err(IconError::NotSvg(_))));
        assert!(matches!(
            rescale_svg(r#"<svg width="auto"/>"#, 10.0),
            Err(IconError::Dimension { attribute: "width", .. })
        ));
        assert!(matches!(
            rescale_svg(r#"<svg height="0"/>"#, 10.0),
            Err(IconError::Dimension { attribute: "height", .. })
        ));
        assert!(matches!(
            rescale_svg(r#"<svg viewBox="0 0 24"/>"#, 10.0),
            Err(IconError::ViewBox(_))
        ));
    }

    #[test]
    fn leading_number_matches_lenient_parse() {
        assert_eq!(leading_number("24"), Some(24.0));
        assert_eq!(leading_number(" 12.5px"), Some(12.5));
        assert_eq!(leading_number("1e2em"), Some(100.0));
        assert_eq!(leading_number("px"), None);
    }

    #[test]
    fn rasterizes_through_png() {
        let scaled = rescale_svg(CIRCLE_ICON, 48.0).unwrap();
        let png = render_intermediate(&scaled).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
        let bitmap = decode_bitmap(&png).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (48, 48));
        let center = bitmap.pixel(24, 24).unwrap().demultiply();
        assert_eq!(center.alpha(), 255);
        assert_eq!(center.red(), 255);
        assert_eq!(bitmap.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn composites_centered_on_circle() {
        let icons = MemoryIcons::with("star.svg", CIRCLE_ICON);
        let geometry = BadgeGeometry::new(200.0, BADGE_SCALE);
        let mut surface = RecordingSurface::new();
        draw_icon(&icons, "star.svg", &geometry, &mut surface).unwrap();

        let images: Vec<_> = surface.images().collect();
        assert_eq!(images.len(), 1);
        let DrawOp::DrawImage { rect, image_size, .. } = images[0] else {
            unreachable!();
        };
        let icon_size = 170.0 * ICON_SCALE;
        assert_eq!(*rect, (100.0 - icon_size / 2.0, 85.0 - icon_size / 2.0, icon_size, icon_size));
        assert_eq!(*image_size, (145, 145));
        assert_eq!(*icons.reads.borrow(), vec!["star.svg".to_string()]);
    }

    #[test]
    fn missing_file_reports_icon_name() {
        let icons = MemoryIcons::default();
        let geometry = BadgeGeometry::new(200.0, BADGE_SCALE);
        let mut surface = RecordingSurface::new();
        let err = draw_icon(&icons, "nonexistent.svg", &geometry, &mut surface).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load SVG icon: nonexistent.svg");
        assert!(matches!(
            err,
            BadgeError::IconLoad { source: IconError::Io(_), .. }
        ));
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn malformed_icon_draws_nothing() {
        let icons = MemoryIcons::with("broken.svg", "<svg><g></svg>");
        let geometry = BadgeGeometry::new(200.0, BADGE_SCALE);
        let mut surface = RecordingSurface::new();
        let err = draw_icon(&icons, "broken.svg", &geometry, &mut surface).unwrap_err();
        assert!(err.to_string().contains("broken.svg"));
        assert!(surface.ops.is_empty());
    }
}
