use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("Invalid color '{color}'. Choose from: {valid}")]
    InvalidColor { color: String, valid: String },

    #[error("Failed to load SVG icon: {icon}")]
    IconLoad {
        icon: String,
        #[source]
        source: IconError,
    },

    #[error("Error saving badge to {}: {message}", path.display())]
    Save { path: PathBuf, message: String },

    #[error("failed to allocate {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
}

impl BadgeError {
    pub(crate) fn icon_load(icon: &str, source: impl Into<IconError>) -> Self {
        Self::IconLoad {
            icon: icon.to_string(),
            source: source.into(),
        }
    }
}

/// Cause of an icon load failure, nested under [`BadgeError::IconLoad`].
#[derive(Debug, Error)]
pub enum IconError {
    #[error("could not read icon file: {0}")]
    Io(#[from] io::Error),

    #[error("icon is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error("invalid {attribute} '{value}'")]
    Dimension {
        attribute: &'static str,
        value: String,
    },

    #[error("invalid viewBox '{0}'")]
    ViewBox(String),

    #[error("rescaled icon could not be parsed: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to rasterize icon: {0}")]
    Raster(String),
}
