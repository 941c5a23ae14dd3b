use crate::badge::create_badge;
use crate::colors::ColorName;
use crate::config::{BadgeConfig, Settings, load_config};
use crate::icons::{IconLibrary, import_icons};
use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "badgegen", version, about = "Generate circular icon badges as PNG")]
pub struct Args {
    /// Settings file (JSON5)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the SVG icons
    #[arg(long = "icons-dir", global = true)]
    pub icons_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a badge from command-line options
    Create(CreateArgs),
    /// Ask for the badge settings interactively (default)
    Prompt,
    /// List the badge colors
    Colors {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the icon directory
    Icons {
        #[command(subcommand)]
        action: IconsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum IconsCommand {
    /// List available icons
    List,
    /// Copy SVG icons from a local directory, recolored white
    Import {
        /// Directory containing the source SVG files
        source: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Label text
    #[arg(short = 't', long = "text", value_parser = non_blank)]
    pub text: String,

    /// Badge color name
    #[arg(long = "color", default_value = "primary")]
    pub color: String,

    /// Icon file name inside the icon directory
    #[arg(short = 'i', long = "icon")]
    pub icon: Option<String>,

    /// Output PNG path
    #[arg(short = 'o', long = "output", default_value = "badge.png")]
    pub output: PathBuf,

    /// Badge side length in pixels
    #[arg(short = 's', long = "size")]
    pub size: Option<u32>,

    /// Create missing parent directories of the output path
    #[arg(long = "create-dirs")]
    pub create_dirs: bool,
}

impl CreateArgs {
    fn to_config(&self) -> BadgeConfig {
        BadgeConfig {
            text: self.text.clone(),
            color: self.color.clone(),
            output: self.output.clone(),
            size: self.size,
            icon: self.icon.clone(),
        }
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("text must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = load_config(args.config.as_deref())?;
    if let Some(dir) = args.icons_dir {
        settings.icons_dir = dir;
    }

    match args.command {
        Some(Command::Create(create)) => {
            if create.create_dirs {
                settings.create_output_dir = true;
            }
            generate(&create.to_config(), &settings)
        }
        Some(Command::Prompt) | None => run_interactive(&settings),
        Some(Command::Colors { json }) => {
            print_colors(json)?;
            Ok(())
        }
        Some(Command::Icons { action }) => run_icons(action, &settings),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn generate(config: &BadgeConfig, settings: &Settings) -> Result<()> {
    eprintln!("Generating badge...");
    match create_badge(config, settings)? {
        Some(path) => {
            println!("Badge generated successfully: {}", path.display());
            Ok(())
        }
        None => Err(anyhow!(
            "badge could not be saved to {}",
            config.output.display()
        )),
    }
}

#[cfg(not(feature = "prompt"))]
fn run_interactive(_settings: &Settings) -> Result<()> {
    Err(anyhow!(
        "interactive prompt is not available in this build; use `badgegen create`"
    ))
}

#[cfg(feature = "prompt")]
fn run_interactive(settings: &Settings) -> Result<()> {
    let library = IconLibrary::new(&settings.icons_dir);
    match crate::prompt::run_prompt(&library)? {
        Some(config) => generate(&config, settings),
        None => {
            eprintln!("Cancelled.");
            Ok(())
        }
    }
}

fn print_colors(json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = ColorName::ALL
            .iter()
            .map(|color| serde_json::json!({ "name": color.as_str(), "hex": color.hex() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for line in color_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

fn color_lines() -> Vec<String> {
    ColorName::ALL
        .iter()
        .map(|color| format!("{:<10} {}", color.as_str(), color.hex()))
        .collect()
}

fn run_icons(action: IconsCommand, settings: &Settings) -> Result<()> {
    let library = IconLibrary::new(&settings.icons_dir);
    match action {
        IconsCommand::List => {
            let icons = library.list().map_err(|err| {
                anyhow!(
                    "failed to read icons directory {}: {err}",
                    library.dir().display()
                )
            })?;
            for icon in icons {
                println!("{icon}");
            }
        }
        IconsCommand::Import { source } => {
            let count = import_icons(&source, library.dir())?;
            println!(
                "Imported {count} icons into {}",
                library.dir().display()
            );
        }
    }
    Ok(())
}
