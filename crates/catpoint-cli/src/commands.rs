//! Subcommands and the interactive shell that runs them.

use std::{
  io::{BufRead, Write},
  path::PathBuf,
};

use anyhow::{Context as _, Result, anyhow, bail};
use catpoint_core::{
  SecurityService,
  classifier::ImageClassifier,
  repository::SecurityRepository,
  sensor::{Sensor, SensorType},
  status::ArmingStatus,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ─── Command definitions ──────────────────────────────────────────────────────

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Show arming status, alarm status and sensor counts.
  Status,
  /// List sensors.
  Sensors {
    /// Print as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Register a new (inactive) sensor.
  AddSensor(SensorArgs),
  /// Forget a sensor.
  RemoveSensor(SensorArgs),
  /// Mark a sensor as tripped.
  Activate(SensorArgs),
  /// Mark a sensor as quiet.
  Deactivate(SensorArgs),
  /// Arm the system.
  Arm {
    #[arg(value_enum)]
    mode: ArmMode,
  },
  /// Disarm the system and clear the alarm.
  Disarm,
  /// Run camera images through the cat detector.
  Scan {
    #[arg(required = true)]
    images: Vec<PathBuf>,
  },
  /// Read commands from stdin, one per line, against a single controller.
  Shell,
}

#[derive(Args, Debug, Clone)]
pub struct SensorArgs {
  /// Sensor name, e.g. "Front Door".
  pub name:        String,
  /// door, window or motion.
  pub sensor_type: SensorType,
}

impl SensorArgs {
  fn sensor(&self) -> Sensor { Sensor::new(self.name.clone(), self.sensor_type) }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ArmMode {
  Home,
  Away,
}

impl From<ArmMode> for ArmingStatus {
  fn from(mode: ArmMode) -> Self {
    match mode {
      ArmMode::Home => ArmingStatus::ArmedHome,
      ArmMode::Away => ArmingStatus::ArmedAway,
    }
  }
}

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
  #[command(subcommand)]
  command: Command,
}

// ─── Execution ────────────────────────────────────────────────────────────────

/// Run a single non-shell command.
pub fn execute<R, C>(
  svc: &mut SecurityService<R, C>,
  command: Command,
  out: &mut impl Write,
) -> Result<()>
where
  R: SecurityRepository,
  C: ImageClassifier,
{
  match command {
    Command::Status => {
      let sensors = svc.sensors()?;
      let active = sensors.iter().filter(|s| s.active).count();
      writeln!(out, "arming:  {}", svc.arming_status()?)?;
      writeln!(out, "alarm:   {}", svc.alarm_status()?)?;
      writeln!(out, "sensors: {active}/{} active", sensors.len())?;
    }
    Command::Sensors { json } => {
      let sensors: Vec<Sensor> = svc.sensors()?.into_iter().collect();
      if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&sensors)?)?;
      } else {
        for s in &sensors {
          let state = if s.active { "active" } else { "inactive" };
          let kind = s.sensor_type.to_string();
          writeln!(out, "{:<24} {kind:<8} {state}", s.name)?;
        }
      }
    }
    Command::AddSensor(args) => {
      svc.add_sensor(&args.sensor())?;
      writeln!(out, "added {} ({})", args.name, args.sensor_type)?;
    }
    Command::RemoveSensor(args) => {
      let sensor = find_sensor(svc, &args)?;
      svc.remove_sensor(&sensor)?;
      writeln!(out, "removed {} ({})", args.name, args.sensor_type)?;
    }
    Command::Activate(args) => {
      let mut sensor = find_sensor(svc, &args)?;
      svc.change_sensor_activation_status(&mut sensor, true)?;
    }
    Command::Deactivate(args) => {
      let mut sensor = find_sensor(svc, &args)?;
      svc.change_sensor_activation_status(&mut sensor, false)?;
    }
    Command::Arm { mode } => svc.set_arming_status(mode.into())?,
    Command::Disarm => svc.set_arming_status(ArmingStatus::Disarmed)?,
    Command::Scan { images } => {
      for path in images {
        let bytes = std::fs::read(&path)
          .with_context(|| format!("failed to read image {}", path.display()))?;
        let cat = svc
          .process_image(&bytes)
          .with_context(|| format!("failed to process {}", path.display()))?;
        let verdict = if cat { "cat" } else { "no cat" };
        writeln!(out, "{}: {verdict}", path.display())?;
      }
    }
    Command::Shell => bail!("already in a shell"),
  }
  Ok(())
}

fn find_sensor<R, C>(
  svc: &SecurityService<R, C>,
  args: &SensorArgs,
) -> Result<Sensor>
where
  R: SecurityRepository,
  C: ImageClassifier,
{
  svc
    .sensors()?
    .get(&args.sensor())
    .cloned()
    .ok_or_else(|| anyhow!("no {} sensor named {:?}", args.sensor_type, args.name))
}

/// Run commands read line by line from `input` until EOF, `quit` or `exit`.
///
/// A failing command is reported on `out` and the session continues; only
/// I/O errors on `input`/`out` end it early.
pub fn run_shell<R, C>(
  svc: &mut SecurityService<R, C>,
  input: impl BufRead,
  out: &mut impl Write,
) -> Result<()>
where
  R: SecurityRepository,
  C: ImageClassifier,
{
  for line in input.lines() {
    let line = line.context("failed to read command")?;
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    if matches!(line, "quit" | "exit") {
      break;
    }

    let words = match split_words(line) {
      Ok(words) => words,
      Err(e) => {
        writeln!(out, "error: {e}")?;
        continue;
      }
    };

    match ShellLine::try_parse_from(words) {
      Ok(parsed) => {
        if let Err(e) = execute(svc, parsed.command, out) {
          tracing::warn!(error = %e, "shell command failed");
          writeln!(out, "error: {e:#}")?;
        }
      }
      Err(e) => write!(out, "{e}")?,
    }
    out.flush()?;
  }
  Ok(())
}

/// Split a shell line on whitespace, keeping double-quoted runs together.
pub fn split_words(line: &str) -> Result<Vec<String>> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quoted = false;

  for c in line.chars() {
    match c {
      '"' => {
        quoted = !quoted;
        in_word = true;
      }
      c if c.is_whitespace() && !quoted => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      c => {
        current.push(c);
        in_word = true;
      }
    }
  }

  if quoted {
    bail!("unterminated quote");
  }
  if in_word {
    words.push(current);
  }
  Ok(words)
}
