//! Cadence Player - play a song catalog from the terminal
use anyhow::Context;
use cadence_playback::PlaybackManager;
use cadence_player::{
    catalog,
    commands::{Command, HELP},
    config::PlayerConfig,
    output::SimulatedOutput,
    session::{Reply, Session},
};
use cadence_storage::JsonFileStore;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-player")]
#[command(about = "Play a song catalog through the Cadence playback engine", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml when present)
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Song list JSON, overrides catalog.path
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Local storage file, overrides storage.state_path
    #[arg(long)]
    state: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so the prompt output stays readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_player=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = PlayerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(state) = cli.state {
        config.storage.state_path = state;
    }
    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let songs = match &config.catalog.path {
        Some(path) => catalog::load_catalog(path)?,
        None => {
            tracing::info!("No catalog configured, using demo songs");
            catalog::demo_catalog()
        }
    };

    let store = JsonFileStore::open(&config.storage.state_path).with_context(|| {
        format!(
            "opening local storage at {}",
            config.storage.state_path.display()
        )
    })?;

    let mut manager = PlaybackManager::new(config.playback.clone(), Box::new(store));
    let output = SimulatedOutput::new(manager.message_sender(), &config.simulation);
    manager.attach_output(Box::new(output));
    let mut inbox = manager
        .take_message_receiver()
        .context("engine inbox already taken")?;

    tracing::info!("Session started with {} songs", songs.len());
    let mut session = Session::new(manager, songs);

    println!("{}", HELP);
    if let Reply::Text(listing) = session.execute(Command::List {
        filter: String::new(),
    }) {
        println!("{}", listing);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match session.execute(command) {
                        Reply::Quit => break,
                        Reply::Text(text) if !text.is_empty() => println!("{}", text),
                        Reply::Text(_) => {}
                    },
                    Err(e) => println!("{}", e),
                }
            }
            Some(message) = inbox.recv() => {
                session.manager_mut().handle_message(message);
            }
        }

        for line in session.drain_messages() {
            println!("{}", line);
        }
    }

    session.manager_mut().shutdown();
    tracing::info!("Session ended");
    Ok(())
}
