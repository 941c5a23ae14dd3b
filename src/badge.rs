use crate::background::{BADGE_SCALE, BadgeGeometry, draw_background};
use crate::canvas::Canvas;
use crate::colors;
use crate::config::{BadgeConfig, Settings};
use crate::error::BadgeError;
use crate::icon::draw_icon;
use crate::icons::{IconLibrary, IconSource};
use crate::label::draw_label;
use crate::surface::DrawingSurface;
use crate::theme::Theme;
use resvg::tiny_skia::Color;
use std::fs;
use std::path::{Path, PathBuf};

/// Render `config` and write it as PNG, reading icons from `settings.icons_dir`.
///
/// Returns `Ok(None)` when the image could not be encoded or written; that
/// failure is logged rather than raised.
pub fn create_badge(config: &BadgeConfig, settings: &Settings) -> Result<Option<PathBuf>, BadgeError> {
    let icons = IconLibrary::new(&settings.icons_dir);
    create_badge_with(config, settings, &icons)
}

pub fn create_badge_with(
    config: &BadgeConfig,
    settings: &Settings,
    icons: &dyn IconSource,
) -> Result<Option<PathBuf>, BadgeError> {
    let color = resolve_color(&config.color)?;
    let size = config.size_or(settings.default_size);

    let mut canvas = Canvas::new(size, size)?;
    if let Some(background) = settings.theme.background.as_deref().and_then(colors::parse_hex) {
        canvas.clear(background);
    }
    draw_badge(config, color, size, &settings.theme, icons, &mut canvas)?;

    match save_png(&canvas, &config.output, settings.create_output_dir) {
        Ok(()) => {
            log::info!("badge written to {}", config.output.display());
            Ok(Some(config.output.clone()))
        }
        Err(err) => {
            log::error!("{err}");
            Ok(None)
        }
    }
}

/// Draw background, icon and label, in that order, onto `surface`.
pub fn draw_badge<S: DrawingSurface + ?Sized>(
    config: &BadgeConfig,
    color: Color,
    size: u32,
    theme: &Theme,
    icons: &dyn IconSource,
    surface: &mut S,
) -> Result<BadgeGeometry, BadgeError> {
    let geometry = draw_background(size as f32, BADGE_SCALE, color, surface);

    if let Some(icon) = config.icon_name() {
        draw_icon(icons, icon, &geometry, surface)?;
    }

    draw_label(
        size as f32,
        geometry.circle_diameter,
        surface,
        &config.text,
        color,
        theme,
    );
    Ok(geometry)
}

fn resolve_color(name: &str) -> Result<Color, BadgeError> {
    let hex = colors::resolve(name)?;
    // Palette entries are always well-formed.
    Ok(colors::parse_hex(hex).unwrap_or(Color::BLACK))
}

fn save_png(canvas: &Canvas, output: &Path, create_dirs: bool) -> Result<(), BadgeError> {
    let save_error = |message: String| BadgeError::Save {
        path: output.to_path_buf(),
        message,
    };
    let png = canvas.encode_png().map_err(save_error)?;
    if create_dirs
        && let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|err| save_error(err.to_string()))?;
    }
    fs::write(output, png).map_err(|err| save_error(err.to_string()))
}
