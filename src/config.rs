use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SIZE: u32 = 200;

/// Input to a single badge generation.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeConfig {
    pub text: String,
    /// Symbolic color name, validated by the orchestrator.
    pub color: String,
    pub output: PathBuf,
    pub size: Option<u32>,
    /// Icon file name inside the icon library.
    pub icon: Option<String>,
}

impl BadgeConfig {
    pub fn new(text: impl Into<String>, color: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
            output: output.into(),
            size: None,
            icon: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Canvas side; a missing or zero size falls back to `default`.
    pub fn size_or(&self, default: u32) -> u32 {
        match self.size {
            Some(size) if size > 0 => size,
            _ => default.max(1),
        }
    }

    /// The icon to draw, if any. Blank names count as no icon.
    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub icons_dir: PathBuf,
    pub default_size: u32,
    pub create_output_dir: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            icons_dir: PathBuf::from("icons"),
            default_size: DEFAULT_SIZE,
            create_output_dir: false,
            theme: Theme::default(),
        }
    }
}

/// Load settings from a JSON5 (or plain JSON) file. `None` yields defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let settings: Settings = json5::from_str(&contents)?;
    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_defaults_when_missing_or_zero() {
        let config = BadgeConfig::new("Hi", "primary", "out.png");
        assert_eq!(config.size_or(DEFAULT_SIZE), 200);
        assert_eq!(config.clone().with_size(0).size_or(DEFAULT_SIZE), 200);
        assert_eq!(config.with_size(64).size_or(DEFAULT_SIZE), 64);
    }

    #[test]
    fn blank_icon_is_no_icon() {
        let config = BadgeConfig::new("Hi", "primary", "out.png");
        assert_eq!(config.icon_name(), None);
        assert_eq!(config.clone().with_icon("  ").icon_name(), None);
        assert_eq!(config.with_icon("star.svg").icon_name(), Some("star.svg"));
    }

    #[test]
    fn missing_path_gives_defaults() {
        let settings = load_config(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_json5_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge.json5");
        std::fs::write(
            &path,
            r##"{
                // comments are allowed
                iconsDir: "assets/icons",
                defaultSize: 128,
                theme: { fontFamily: "DejaVu Sans", background: "#222222" },
            }"##,
        )
        .unwrap();

        let settings = load_config(Some(&path)).unwrap();
        assert_eq!(settings.icons_dir, PathBuf::from("assets/icons"));
        assert_eq!(settings.default_size, 128);
        assert!(!settings.create_output_dir);
        assert_eq!(settings.theme.font_family, "DejaVu Sans");
        assert_eq!(settings.theme.background.as_deref(), Some("#222222"));
        assert_eq!(settings.theme.shadow_alpha, 0.1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ iconsDir: ").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
