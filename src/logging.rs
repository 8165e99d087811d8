//! File logging. The terminal UI owns stdout, so events go to
//! `~/.intervo/intervo.log`; `RUST_LOG` overrides the default filter.

use crate::storage::Storage;
use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "intervo=debug" } else { "intervo=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let log_path = Storage::get_base_dir()?.join("intervo.log");
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .init();
            tracing::info!(log_file = ?log_path, debug = verbose, "logging initialized");
        }
        Err(err) => {
            eprintln!(
                "Failed to open log file {}: {}, logging to stderr",
                log_path.display(),
                err
            );
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
