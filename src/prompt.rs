//! Interactive badge prompt.

use crate::colors;
use crate::config::BadgeConfig;
use crate::icons::IconLibrary;
use anyhow::{Context, Result, bail};
use dialoguer::{Input, Select, theme::ColorfulTheme};

const FALLBACK_ICON: &str = "star.svg";
const NO_ICON: &str = "(no icon)";

/// Raw answers collected by [`run_prompt`].
#[derive(Debug, Clone, PartialEq)]
pub struct PromptAnswers {
    pub text: String,
    pub icon: Option<String>,
    pub color: String,
    /// Output file name without extension.
    pub output: String,
    pub size: String,
}

/// Build a badge config from prompt answers; `.png` is appended to the output name.
pub fn config_from_answers(answers: PromptAnswers) -> Result<BadgeConfig> {
    let text = answers.text.trim();
    if text.is_empty() {
        bail!("badge text is required");
    }
    let output = answers.output.trim();
    if output.is_empty() {
        bail!("output name is required");
    }
    let size = match answers.size.trim() {
        "" => None,
        raw => Some(
            raw.parse::<u32>()
                .with_context(|| format!("badge size '{raw}' is not a positive integer"))?,
        ),
    };

    Ok(BadgeConfig {
        text: text.to_string(),
        color: answers.color,
        output: format!("{output}.png").into(),
        size,
        icon: answers.icon,
    })
}

/// Icon names to offer; falls back to the star icon when the directory is unreadable.
pub fn icon_choices(library: &IconLibrary) -> Vec<String> {
    match library.list() {
        Ok(icons) => icons,
        Err(err) => {
            log::warn!(
                "error reading icons directory {}: {err}",
                library.dir().display()
            );
            vec![FALLBACK_ICON.to_string()]
        }
    }
}

/// Ask for every badge setting. Returns `None` if the user cancels a selection.
pub fn run_prompt(library: &IconLibrary) -> Result<Option<BadgeConfig>> {
    let theme = ColorfulTheme::default();

    let text: String = Input::with_theme(&theme)
        .with_prompt("Enter the badge text")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("badge text is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to read badge text")?;

    let mut icons = icon_choices(library);
    let default_icon = icons
        .iter()
        .position(|name| name == FALLBACK_ICON)
        .unwrap_or(0);
    icons.push(NO_ICON.to_string());
    let Some(icon_index) = Select::with_theme(&theme)
        .with_prompt("Choose an SVG icon")
        .items(&icons)
        .default(default_icon)
        .interact_opt()
        .context("Failed to read icon selection")?
    else {
        return Ok(None);
    };
    let icon = Some(icons[icon_index].clone()).filter(|name| name != NO_ICON);

    let color_names = colors::available_colors();
    let Some(color_index) = Select::with_theme(&theme)
        .with_prompt("Choose a color")
        .items(&color_names)
        .default(0)
        .interact_opt()
        .context("Failed to read color selection")?
    else {
        return Ok(None);
    };

    let output: String = Input::with_theme(&theme)
        .with_prompt("Enter the output filename (without extension)")
        .default("badge".to_string())
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("output name is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to read output name")?;

    let size: String = Input::with_theme(&theme)
        .with_prompt("Enter the badge size")
        .default(crate::config::DEFAULT_SIZE.to_string())
        .validate_with(|input: &String| -> Result<(), &'static str> {
            match input.trim() {
                "" => Ok(()),
                raw if raw.parse::<u32>().is_ok() => Ok(()),
                _ => Err("size must be a whole number"),
            }
        })
        .interact_text()
        .context("Failed to read badge size")?;

    let answers = PromptAnswers {
        text,
        icon,
        color: color_names[color_index].to_string(),
        output,
        size,
    };
    config_from_answers(answers).map(Some)
}
