//! Runtime configuration, read from an optional TOML file layered under
//! `CATPOINT_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Which image classifier the controller is wired to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
  /// Coin flip per image.
  #[default]
  Random,
  /// Every image contains a cat.
  Always,
  /// No image contains a cat.
  Never,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub classifier: ClassifierMode,
}

fn default_store_path() -> PathBuf { PathBuf::from("catpoint.db") }

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path: default_store_path(),
      classifier: ClassifierMode::default(),
    }
  }
}

impl AppConfig {
  /// Load from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CATPOINT"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
