// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use media_engine::{AudioPlayer, MediaEngine, OutputTarget};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storystream_config::{Config, ConfigManager};
use storystream_library::{BookLoader, BookParser};
use storystream_player::{Environment, PlayerFeature, PlayerSettings, PlayerState, Store};

mod app;
mod keys;
mod render;

fn build_cli() -> Command {
    Command::new("storystream")
        .version(env!("CARGO_PKG_VERSION"))
        .author("StoryStream Team")
        .about("Console audiobook player")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml"),
        )
        .arg(
            Arg::new("resources")
                .short('r')
                .long("resources")
                .value_name("DIR")
                .help("Directory holding the book record and its audio files"),
        )
        .arg(
            Arg::new("book")
                .short('b')
                .long("book")
                .value_name("IDENTIFIER")
                .help("Identifier of the book to open"),
        )
        .arg(
            Arg::new("no-audio")
                .long("no-audio")
                .action(ArgAction::SetTrue)
                .help("Decode and track position without opening an output device"),
        )
}

fn output_target(matches: &clap::ArgMatches) -> OutputTarget {
    if matches.get_flag("no-audio") {
        OutputTarget::Discard
    } else {
        OutputTarget::Device
    }
}

fn load_config(matches: &clap::ArgMatches) -> Result<Config> {
    let manager = match matches.get_one::<String>("config-dir") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir)),
        None => ConfigManager::new(),
    }
    .context("Failed to locate configuration")?;

    let mut config = manager
        .load_with_env_overrides()
        .context("Failed to load configuration")?;

    if let Some(dir) = matches.get_one::<String>("resources") {
        config.library.resource_dir = PathBuf::from(dir);
    }
    if let Some(book) = matches.get_one::<String>("book") {
        config.library.book_identifier = book.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let config = load_config(&matches)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();

    log::info!(
        "Opening \"{}\" from {}",
        config.library.book_identifier,
        config.library.resource_dir.display()
    );

    let engine: Arc<dyn AudioPlayer> = Arc::new(MediaEngine::with_output(
        config.library.resource_dir.clone(),
        output_target(&matches),
    ));
    let loader: Arc<dyn BookLoader> = Arc::new(BookParser::from_config(&config.library));
    let env = Environment::new(engine, loader)
        .with_poll_interval(Duration::from_millis(config.player.progress_poll_ms));

    let store = Store::spawn(
        PlayerFeature::new(PlayerSettings::from_config(&config.player, &config.library)),
        PlayerState::new(config.player.default_speed),
        env,
    );

    app::ConsolePlayer::new(
        store,
        config.player.speed_presets.clone(),
        Duration::from_millis(config.player.ui_refresh_ms),
    )
    .run()
    .await
}
