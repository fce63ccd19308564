use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use leveled_log::{Config, Flags, Level};

/// Write one leveled line through the default logger
#[derive(Debug, Parser)]
#[command(name = "leveled-log", version)]
struct Args {
    /// TOML file describing the logger
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lowest level written, overrides the config file
    #[arg(short, long)]
    level: Option<Level>,

    /// Decoration flags such as "DATE | TIME | SHORT_FILE", overrides the config file
    #[arg(short, long)]
    flags: Option<Flags>,

    /// Level of the message: debug, info, warn, error, fatal or panic
    message_level: Level,

    /// Message words, joined with spaces
    #[arg(required = true)]
    message: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leveled_log=warn".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(flags) = args.flags {
        config.flags = flags;
    }

    leveled_log::init(config.build()?)?;
    tracing::debug!("Logger ready: {:?}", leveled_log::default());

    let message = args.message.join(" ");
    match args.message_level {
        Level::Debug => leveled_log::debug(message),
        Level::Info => leveled_log::info(message),
        Level::Warn => leveled_log::warn(message),
        Level::Error => leveled_log::error(message),
        Level::Fatal => leveled_log::fatal(message),
        Level::Panic => leveled_log::panic(message),
    }

    Ok(())
}
