//! Layered settings: built-in defaults, then the TOML file, then `JOBWORK_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "jobwork.toml";
const DEFAULT_DATABASE: &str = "data/inventory.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  /// SQLite file holding the ledger.
  pub database:      PathBuf,
  /// Where the terminal browser writes exports.
  pub export_dir:    PathBuf,
  /// Default number of `goods suggest` results.
  pub suggest_limit: usize,
}

impl Settings {
  /// Load settings from `file` (which may be missing) and the environment.
  /// `database` overrides every other source.
  pub fn load(file: &Path, database: Option<&Path>) -> anyhow::Result<Self> {
    Self::load_with_env(file, database, None)
  }

  /// [`Settings::load`], reading `JOBWORK_*` variables from `env` instead of
  /// the process environment when given.
  fn load_with_env(
    file: &Path,
    database: Option<&Path>,
    env: Option<config::Map<String, String>>,
  ) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .set_default("database", DEFAULT_DATABASE)?
      .set_default("export_dir", ".")?
      .set_default("suggest_limit", 10_i64)?
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("JOBWORK")
          .try_parsing(true)
          .source(env),
      )
      .set_override_option(
        "database",
        database.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.database = expand_tilde(&settings.database);
    settings.export_dir = expand_tilde(&settings.export_dir);
    Ok(settings)
  }

  /// Create the directory the database lives in, if it has one.
  pub fn ensure_database_dir(&self) -> anyhow::Result<()> {
    if let Some(parent) = self.database.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
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
