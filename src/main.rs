use anyhow::Result;
use clap::{Parser, Subcommand};
use hms_keypad::commands;
use hms_keypad::{OutputFormat, config, logging};

#[derive(Parser)]
#[command(name = "hmsk")]
#[command(about = "Calculator-style h:mm:ss duration keypad")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press keys in order (0-9, delete, clear)
    Press {
        #[arg(required = true, help = "Keys to press, e.g. 1 3 0 or delete")]
        keys: Vec<String>,
    },
    /// Delete the most recent digit
    Delete,
    /// Clear all digits (long press on delete)
    Clear,
    /// Set the time directly
    Set {
        #[arg(help = "Hours")]
        hours: u32,
        #[arg(help = "Minutes")]
        minutes: u32,
        #[arg(default_value = "0", help = "Seconds")]
        seconds: u32,
        #[arg(long, help = "Reject values that do not fit instead of truncating")]
        strict: bool,
    },
    /// Show the current entry
    Show,
    /// Set the saved theme id, or reset it to the configured default
    Theme {
        #[arg(help = "Theme id; omit to reset to the configured default")]
        name: Option<String>,
    },
    /// Read or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let format = cli.format;

    // Writes go straight to the file so a broken config can still be fixed
    if let Commands::Config {
        action: ConfigAction::Set { key, value },
    } = &cli.command
    {
        return commands::config::set(key, value);
    }

    let config = config::load()?;

    match cli.command {
        Commands::Press { keys } => commands::keypad::press(&config, &keys, format)?,
        Commands::Delete => commands::keypad::delete(&config, format)?,
        Commands::Clear => commands::keypad::clear(&config, format)?,
        Commands::Set {
            hours,
            minutes,
            seconds,
            strict,
        } => commands::keypad::set(&config, hours, minutes, seconds, strict, format)?,
        Commands::Show => commands::keypad::show(&config, format)?,
        Commands::Theme { name } => commands::keypad::theme(&config, name, format)?,
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(&key, &config)?,
            ConfigAction::Set { key, value } => commands::config::set(&key, &value)?,
        },
    }

    Ok(())
}
