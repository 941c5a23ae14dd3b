//! Icon directory access and icon-set import.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static DARK_PAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(fill|stroke)="(?:#000000|currentColor)""#).unwrap()
});

/// Where the icon renderer gets SVG markup from.
pub trait IconSource {
    fn load_svg(&self, name: &str) -> io::Result<String>;
}

/// A directory of `.svg` icon files.
#[derive(Debug, Clone)]
pub struct IconLibrary {
    dir: PathBuf,
}

impl IconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Sorted file names of the SVG icons in the directory.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let mut icons = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_svg_name(&name) {
                icons.push(name);
            }
        }
        icons.sort();
        Ok(icons)
    }
}

impl IconSource for IconLibrary {
    fn load_svg(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.path(name))
    }
}

fn is_svg_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Turn black and `currentColor` fills and strokes white so icons read on a colored disc.
pub fn recolor_svg(content: &str) -> String {
    DARK_PAINT_RE
        .replace_all(content, r##"$1="#FFFFFF""##)
        .into_owned()
}

/// Copy every SVG in `source` into `dest`, recolored. Returns the number of icons written.
pub fn import_icons(source: &Path, dest: &Path) -> Result<usize> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("failed to read icon source {}", source.display()))?;
    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create icon directory {}", dest.display()))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_svg_name(&name) || !entry.file_type()?.is_file() {
            continue;
        }
        let content = fs::read_to_string(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;
        fs::write(dest.join(&name), recolor_svg(&content))
            .with_context(|| format!("failed to write {name}"))?;
        log::info!("processed {name}");
        count += 1;
    }
    Ok(count)
}
