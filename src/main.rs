mod clock;
mod config;
mod engine;
mod expander;
mod logging;
mod models;
mod queue;
mod report;
mod scheduler;
mod storage;
mod tui;
mod utils;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use engine::TimerEngine;
use models::{Interval, Playlist};
use report::Reporter;
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use storage::Storage;
use tracing::info;

#[derive(Parser)]
#[command(name = "intervo")]
#[command(about = "A terminal interval timer for workouts and focus blocks", long_about = None)]
struct Cli {
    /// Write debug-level events to the log file
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a playlist file
    Run {
        /// Path to a playlist JSON file
        playlist: PathBuf,
    },
    /// Build a playlist from the command line and play it
    Quick {
        /// Activity length (e.g. 30s, 2m)
        #[arg(short, long)]
        work: String,
        /// Rest after each round (e.g. 10s)
        #[arg(short, long)]
        rest: Option<String>,
        /// Number of rounds
        #[arg(short = 'n', long, default_value_t = 1)]
        rounds: u32,
        /// Activity name
        #[arg(long, default_value = "Work")]
        name: String,
        /// Also write the generated playlist to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the expanded segments of a playlist file
    Show {
        /// Path to a playlist JSON file
        playlist: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug)?;
    let config = config::load_config()?;

    match cli.command {
        Commands::Run { playlist } => {
            let playlist = Storage::from_path(playlist).load()?;
            play(playlist, &config)?;
        }
        Commands::Quick {
            work,
            rest,
            rounds,
            name,
            save,
        } => {
            let playlist = quick_playlist(&name, &work, rest.as_deref(), rounds)?;
            if let Some(path) = save {
                Storage::from_path(path.clone()).save(&playlist)?;
                println!("Saved playlist to {}", path.display());
            }
            play(playlist, &config)?;
        }
        Commands::Show { playlist } => {
            let playlist = Storage::from_path(playlist).load()?;
            Reporter::report(&playlist);
        }
    }

    Ok(())
}

fn play(playlist: Playlist, config: &config::Config) -> Result<()> {
    info!(playlist = %playlist.id, intervals = playlist.intervals.len(), "starting session");
    let mut engine = TimerEngine::new(playlist, config.timing());
    tui::run_tui(
        &mut engine,
        StdDuration::from_millis(config.frame_interval_ms.max(1)),
    )?;
    info!(completed = engine.is_completed(), "session closed");
    Ok(())
}

fn parse_secs(input: &str) -> Result<u64> {
    let duration = humantime::parse_duration(input)
        .with_context(|| format!("Invalid duration '{}' (try 30s, 2m, 1m30s)", input))?;
    let secs = duration.as_secs();
    if secs == 0 {
        bail!("Duration '{}' is shorter than one second", input);
    }
    Ok(secs)
}

fn quick_playlist(name: &str, work: &str, rest: Option<&str>, rounds: u32) -> Result<Playlist> {
    if rounds == 0 {
        bail!("At least one round is required");
    }
    let work = parse_secs(work)?;
    let rest = rest.map(parse_secs).transpose()?;

    let intervals = (1..=rounds)
        .map(|round| {
            let label = if rounds > 1 {
                format!("{} {}", name, round)
            } else {
                name.to_string()
            };
            let interval = Interval::new(label, work);
            match rest {
                // No trailing rest after the final round.
                Some(rest) if round < rounds => interval.with_rest(rest),
                _ => interval,
            }
        })
        .collect();

    let playlist = Playlist::new(format!("quick-{}x{}", rounds, work), intervals);
    playlist.validate()?;
    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("30s").unwrap(), 30);
        assert_eq!(parse_secs("1m 30s").unwrap(), 90);
        assert!(parse_secs("500ms").is_err());
        assert!(parse_secs("soon").is_err());
    }

    #[test]
    fn test_quick_playlist_rounds() {
        let playlist = quick_playlist("Burpees", "20s", Some("10s"), 3).unwrap();

        assert_eq!(playlist.intervals.len(), 3);
        assert_eq!(playlist.intervals[0], Interval::new("Burpees 1", 20).with_rest(10));
        assert_eq!(playlist.intervals[1].rest, Some(10));
        assert_eq!(playlist.intervals[2], Interval::new("Burpees 3", 20));
    }

    #[test]
    fn test_quick_playlist_single_round() {
        let playlist = quick_playlist("Work", "2m", Some("30s"), 1).unwrap();
        assert_eq!(playlist.intervals, vec![Interval::new("Work", 120)]);
    }

    #[test]
    fn test_quick_playlist_rejects_zero_rounds() {
        assert!(quick_playlist("Work", "30s", None, 0).is_err());
    }
}
