use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use shared::{
    domain::{GameMode, WinnerPick},
    error::Outcome,
};
use storage::{GameStore, JsonFileStore};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wheel_core::{drive_spin, GameStateMachine, RandomSpinner, TokioClock, Wheel};

mod commands;
mod config;
mod console;

use commands::{parse_line, PlayCommand, HELP};
use config::{load_settings, prepare_store_path, Settings};
use console::{phase_name, render_status, Console, Status};

type AppWheel = Wheel<JsonFileStore, StdRng, TokioClock, Console>;

#[derive(Parser, Debug)]
#[command(name = "spinwheel", version, about = "Prize-wheel raffle")]
struct Cli {
    /// Config file; defaults to ./spinwheel.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON store file, overriding config and environment.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Print events and status as JSON lines.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add participants to the current mode.
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Bulk-add names separated by newlines, commas or semicolons. `-` reads stdin.
    Import { path: PathBuf },
    /// Remove participant number N (as shown by `list`).
    Remove { position: usize },
    List,
    /// Spin once and remove the winner, unless --keep.
    Spin {
        #[arg(long)]
        keep: bool,
    },
    Undo,
    Reset,
    /// Show or switch the game mode.
    Mode { mode: Option<GameMode> },
    /// Interactive session reading commands from stdin.
    Play,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        settings.store_path = store;
    }

    let mut wheel = open_wheel(&settings, Console::new(cli.json))?;
    let frame_interval = settings.frame_interval();

    match cli.command {
        Command::Add { names } => {
            for name in names {
                report(&name, wheel.add_participant(&name));
            }
        }
        Command::Import { path } => {
            let text = read_import(&path).await?;
            match wheel.import_participants(&text) {
                Ok(summary) => println!(
                    "added {}, skipped {} duplicate or blank",
                    summary.added, summary.skipped
                ),
                Err(reason) => eprintln!("import ignored: {reason}"),
            }
        }
        Command::Remove { position } => {
            let Some(index) = position.checked_sub(1) else {
                anyhow::bail!("participant numbers start at 1");
            };
            remove(&mut wheel, index);
        }
        Command::List => print_status(&wheel),
        Command::Spin { keep } => {
            if let Some(pick) = spin(&mut wheel, frame_interval).await? {
                let outcome = if keep {
                    wheel.retry_spin()
                } else {
                    wheel.confirm_and_continue()
                };
                report(&pick.name, outcome);
            }
        }
        Command::Undo => report("undo", wheel.undo()),
        Command::Reset => report("reset", wheel.reset()),
        Command::Mode { mode: None } => println!("{}", wheel.machine().mode()),
        Command::Mode { mode: Some(mode) } => report("mode", wheel.switch_mode(mode)),
        Command::Play => play(&mut wheel, frame_interval).await?,
    }

    Ok(())
}

fn open_wheel(settings: &Settings, console: Console) -> Result<AppWheel> {
    let path = prepare_store_path(&settings.store_path)?;
    let kv = JsonFileStore::open(&path)
        .with_context(|| format!("failed to open store '{}'", path.display()))?;
    debug!(path = %path.display(), "opened store");

    let machine = GameStateMachine::new(GameStore::with_keys(kv, settings.storage_keys()));
    let ranges = settings.wheel.spin_ranges();
    let spinner = match settings.seed {
        Some(seed) => RandomSpinner::seeded(seed, ranges),
        None => RandomSpinner::from_entropy(ranges),
    };

    Ok(Wheel::new(
        machine,
        spinner,
        TokioClock::new(),
        console,
        settings.wheel.clone(),
    ))
}

async fn read_import(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read names from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Starts a spin and plays it out. Ctrl-C tears the spin down.
async fn spin(wheel: &mut AppWheel, frame_interval: Duration) -> Result<Option<WinnerPick>> {
    let outcome = wheel.spin();
    if let Outcome::Ignored(reason) = outcome {
        eprintln!("spin ignored: {reason}");
        return Ok(None);
    }

    let mut frames = 0usize;
    let winner = tokio::select! {
        winner = drive_spin(wheel, frame_interval, |_| frames += 1) => winner,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            None
        }
    };
    debug!(frames, "spin settled");
    Ok(winner)
}

async fn play(wheel: &mut AppWheel, frame_interval: Duration) -> Result<()> {
    info!(mode = %wheel.machine().mode(), "interactive session started");
    println!("{HELP}");
    print_status(wheel);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            PlayCommand::Spin => {
                if spin(wheel, frame_interval).await?.is_some() {
                    println!("confirm (c) to remove the winner, retry (r) to keep them");
                }
            }
            PlayCommand::Confirm => report("confirm", wheel.confirm_and_continue()),
            PlayCommand::Retry => report("retry", wheel.retry_spin()),
            PlayCommand::Add(name) => report(&name, wheel.add_participant(&name)),
            PlayCommand::Remove(index) => remove(wheel, index),
            PlayCommand::List => print_status(wheel),
            PlayCommand::Undo => report("undo", wheel.undo()),
            PlayCommand::Reset => report("reset", wheel.reset()),
            PlayCommand::Mode(None) => println!("{}", wheel.machine().mode()),
            PlayCommand::Mode(Some(mode)) => report("mode", wheel.switch_mode(mode)),
            PlayCommand::Help => println!("{HELP}"),
            PlayCommand::Quit => break,
        }
    }

    info!("interactive session ended");
    Ok(())
}

fn remove(wheel: &mut AppWheel, index: usize) {
    let name = wheel
        .machine()
        .participants()
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("#{}", index + 1));
    report(&name, wheel.remove_participant(index));
}

fn report(subject: &str, outcome: Outcome) {
    match outcome {
        Outcome::Applied => debug!(subject, "applied"),
        Outcome::Ignored(reason) => eprintln!("{subject}: ignored, {reason}"),
    }
}

fn print_status(wheel: &AppWheel) {
    let machine = wheel.machine();
    let status = Status {
        mode: machine.mode(),
        phase: phase_name(machine.phase()),
        participants: machine.participants(),
        is_game_over: machine.is_game_over(),
        can_undo: machine.can_undo(),
        winner: machine.winner(),
    };
    println!("{}", render_status(&status, wheel.hooks().is_json()));
}
