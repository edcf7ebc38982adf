use clap::Parser;
use miette::{IntoDiagnostic, Result};
use square_game::application::engine::GameEngine;
use square_game::config::GameConfig;
use square_game::domain::ports::{LayoutGeneratorBox, SnapshotSinkBox};
use square_game::domain::tile::TileLayout;
use square_game::infrastructure::fixed_layout::FixedLayout;
use square_game::infrastructure::random_layout::RandomLayout;
use square_game::interfaces::csv::event_reader::EventReader;
use square_game::interfaces::json::snapshot_writer::{SnapshotWriter, forward_snapshots};
use square_game::interfaces::script::{ScriptEvent, dispatch};
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Event script CSV (`event,value`). Reads stdin when omitted.
    script: Option<PathBuf>,

    /// TOML file with engine settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the board shuffler.
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed board as nine comma-separated colors. Repeat to queue several rounds.
    #[arg(long = "layout")]
    layouts: Vec<TileLayout>,

    /// Seconds per round.
    #[arg(long)]
    round_seconds: Option<u32>,

    /// Do not run the per-second ticker; only `tick` events advance the clock.
    #[arg(long)]
    manual_clock: bool,

    /// Verbose logging on stderr.
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "square_game=info,warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(debug)
        .init();
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path).into_diagnostic()?,
        None => GameConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(seconds) = cli.round_seconds {
        config.round_seconds = seconds;
    }
    if cli.manual_clock {
        config.auto_tick = false;
    }

    config.validate().into_diagnostic()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let config = load_config(&cli)?;

    let layouts: LayoutGeneratorBox = if !cli.layouts.is_empty() {
        Box::new(FixedLayout::new(cli.layouts).into_diagnostic()?)
    } else if let Some(seed) = config.seed {
        Box::new(RandomLayout::seeded(seed))
    } else {
        Box::new(RandomLayout::new())
    };

    let engine = GameEngine::new(config, layouts);

    // Render every state change as a JSON line on stdout
    let sink: SnapshotSinkBox = Box::new(SnapshotWriter::new(io::stdout()));
    let presenter = tokio::spawn(forward_snapshots(engine.subscribe(), sink));
    engine.refresh().await;

    let source: Box<dyn Read> = match cli.script {
        Some(path) => Box::new(File::open(path).into_diagnostic()?),
        None => Box::new(io::stdin()),
    };

    for event in EventReader::new(source).events() {
        match event {
            Ok(ScriptEvent::Exit) => {
                tracing::info!("exit requested");
                break;
            }
            Ok(ScriptEvent::Wait(duration)) => tokio::time::sleep(duration).await,
            Ok(event) => {
                if let Err(e) = dispatch(&engine, event).await {
                    tracing::warn!(?event, error = %e, "Event rejected");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error reading event");
            }
        }
    }

    engine.shutdown().await;
    drop(engine);

    let rendered = presenter.await.into_diagnostic()?.into_diagnostic()?;
    tracing::debug!(rendered, "presenter finished");

    Ok(())
}
