pub mod background;
pub mod badge;
pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod colors;
pub mod config;
pub mod error;
pub mod icon;
pub mod icons;
pub mod label;
#[cfg(feature = "prompt")]
pub mod prompt;
pub mod surface;
pub mod text_metrics;
pub mod theme;

pub use background::{BADGE_SCALE, BadgeGeometry, draw_background};
pub use badge::{create_badge, create_badge_with, draw_badge};
pub use canvas::Canvas;
#[cfg(feature = "cli")]
pub use cli::run;
pub use colors::{ColorName, available_colors, is_valid, resolve};
pub use config::{BadgeConfig, Settings, load_config};
pub use error::{BadgeError, IconError};
pub use icon::{ICON_SCALE, draw_icon, rescale_svg};
pub use icons::{IconLibrary, IconSource, import_icons, recolor_svg};
pub use label::{LabelBox, draw_label};
pub use surface::{DrawOp, DrawingSurface, Font, RecordingSurface};
pub use theme::Theme;
