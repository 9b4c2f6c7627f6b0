//! `catpoint`: command-line front end for the Catpoint alarm controller.
//!
//! # Usage
//!
//! ```text
//! catpoint status
//! catpoint arm home
//! catpoint activate "Front Door" door
//! catpoint scan frame-0001.jpg frame-0002.jpg
//! catpoint --ephemeral shell < script.txt
//! ```
//!
//! Reads `catpoint.toml` (or the path given with `--config`) plus `CATPOINT_*`
//! environment variables, and keeps state in a SQLite file.

mod classifier;
mod commands;
mod config;
mod listener;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use catpoint_core::{
  SecurityService, classifier::ImageClassifier, memory::InMemoryRepository,
  repository::SecurityRepository,
};
use catpoint_store_sqlite::SqliteRepository;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  classifier::StubClassifier,
  commands::{Command, execute, run_shell},
  config::AppConfig,
  listener::ConsoleListener,
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Catpoint home security controller")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "catpoint.toml")]
  config: PathBuf,

  /// Keep state in memory (two default sensors) instead of the SQLite file.
  #[arg(long)]
  ephemeral: bool,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  // Logs go to stderr; stdout carries command output.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;
  let classifier = StubClassifier::from(cfg.classifier);

  if cli.ephemeral {
    let repo = InMemoryRepository::with_default_sensors();
    return run(SecurityService::new(repo, classifier), cli.command);
  }

  let repo = SqliteRepository::open(&cfg.store_path).with_context(|| {
    format!("failed to open store at {}", cfg.store_path.display())
  })?;
  run(SecurityService::new(repo, classifier), cli.command)
}

fn run<R, C>(mut svc: SecurityService<R, C>, command: Command) -> Result<()>
where
  R: SecurityRepository,
  C: ImageClassifier,
{
  svc.add_status_listener(Arc::new(ConsoleListener));

  let stdout = io::stdout();
  let mut out = stdout.lock();
  match command {
    Command::Shell => run_shell(&mut svc, io::stdin().lock(), &mut out),
    other => execute(&mut svc, other, &mut out),
  }
}
