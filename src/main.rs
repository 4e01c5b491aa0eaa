mod characters;
mod config;
mod logging;
mod picker;
mod ports;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{Result, eyre::WrapErr};
use url::Url;

use crate::{
    characters::{Character, client::CharacterHttpAdapter},
    config::Config,
    logging::setup_logging,
    picker::{Picker, PickerConfig},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "CHARACTER_PICKER_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: off)
    #[arg(long, default_value = "off", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "CHARACTER_PICKER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    /// First page of the character endpoint, overrides the config file
    #[arg(long, env = "CHARACTER_PICKER_API_URL")]
    api_url: Option<Url>,

    /// How long the search text must be stable before searching, e.g. `300ms`
    #[arg(long)]
    debounce: Option<humantime::Duration>,

    /// How to print the selection
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// One `id<TAB>name` line per character
    Plain,
    /// A JSON array of characters
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn format_selection(selection: &[Character], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(selection
            .iter()
            .map(|character| format!("{}\t{}\n", character.id, character.name))
            .collect()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(selection)
                .wrap_err("Failed to serialize selection")?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Character picker starting");

    if let Some(Commands::Config(config_commands)) = args.command {
        match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        }
        return Ok(());
    }

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load character-picker config")?;

    let first_page = match args.api_url {
        Some(url) => url,
        None => config.first_page()?,
    };
    let debounce = args
        .debounce
        .map(Into::into)
        .unwrap_or_else(|| config.debounce());
    log::debug!("Using {} with a {:?} debounce", first_page, debounce);

    let source = Arc::new(CharacterHttpAdapter::new(&config.user_agent)?);
    let picker = Picker::new(PickerConfig {
        first_page,
        search_param: config.search_param.clone(),
        debounce,
    });

    match crate::tui::run(source, picker).await? {
        Some(selection) => {
            log::info!("Picked {} characters", selection.len());
            print!("{}", format_selection(&selection, args.output)?);
        }
        None => log::info!("Aborted, nothing picked"),
    }

    Ok(())
}
